//! The RDF metadata layer of a CellDL diagram.
//!
//! A diagram's semantics (which objects exist, what type each one has, and
//! how connections join connectors) live in an RDF graph. The viewer reads
//! that graph through the [`MetadataStore`] trait and never parses RDF
//! serialisations itself; [`MemoryStore`] is a simple triple store for hosts
//! and tests that assemble the graph directly.
//!
//! # Overview
//!
//! - [`Term`], [`NamedNode`], [`BlankNode`], [`Literal`], [`Statement`] - RDF terms and triples
//! - [`MetadataProperties`] - A subject's properties as a predicate-keyed map
//! - [`MetadataStore`] - Queries the viewer makes of a triple store
//! - [`namespaces`] - Well-known namespaces and CURIE helpers

pub mod namespaces;
mod properties;
mod store;
mod term;

pub use namespaces::Namespace;
pub use properties::{MetadataProperties, MetadataPropertyValue};
pub use store::{MemoryStore, MetadataStore};
pub use term::{BlankNode, Literal, NamedNode, Statement, Term};
