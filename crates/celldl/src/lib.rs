//! CellDL - geometry and interaction core for viewing CellDL diagrams.
//!
//! A CellDL diagram is an SVG drawing whose RDF metadata says what each
//! shape is: a component, a conduit, a connector, a connection and so on.
//! This crate binds that metadata to the rendered shapes, tracks each
//! object's geometry as it is moved or resized, and handles pointer
//! interaction with the diagram.
//!
//! The host supplies the diagram's metadata as a [`metadata::MetadataStore`]
//! and its rendering as a [`surface::RenderSurface`], and drives a
//! [`viewer::CellDLViewer`] with pointer events.
//!
//! # Examples
//!
//! ```
//! use celldl::{
//!     metadata::{MemoryStore, MetadataStore, NamedNode, Statement, namespaces},
//!     model::CellDLModel,
//!     surface::MemorySurface,
//!     viewer::CellDLViewer,
//! };
//!
//! let uri = "file:///diagrams/pump.celldl";
//! let mut store = MemoryStore::new();
//! store.add(Statement::new(
//!     NamedNode::new(uri),
//!     namespaces::rdf().uri("type"),
//!     namespaces::celldl().uri("Document"),
//! ));
//! store.add(Statement::new(
//!     NamedNode::new(format!("{uri}#pump")),
//!     namespaces::rdf().uri("type"),
//!     namespaces::celldl().uri("Component"),
//! ));
//! let surface = MemorySurface::from_svg_str(
//!     r#"<svg><rect id="pump" width="100" height="50"/></svg>"#,
//! )?;
//!
//! let mut viewer = CellDLViewer::default();
//! viewer.view_diagram(CellDLModel::new(uri, store, surface)?)?;
//! assert_eq!(viewer.model().map(|model| model.objects().count()), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod element;
pub mod metadata;
pub mod model;
pub mod objects;
pub mod surface;
pub mod viewer;

mod error;

pub use celldl_core::{geometry, identifier, units};

pub use error::CellDLError;
