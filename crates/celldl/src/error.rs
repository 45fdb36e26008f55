//! Error types for CellDL viewer operations.
//!
//! This module provides the main error type [`CellDLError`] which wraps the
//! error conditions that can occur while loading, binding and interacting
//! with a diagram.

use thiserror::Error;

use celldl_core::{geometry::TransformError, identifier::Id};

use crate::{config::ConfigError, surface::SurfaceError};

/// The main error type for CellDL viewer operations.
#[derive(Debug, Error)]
pub enum CellDLError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Metadata doesn't describe a valid CellDL document: {0}")]
    InvalidDocument(String),

    #[error("Invalid transform on `{id}`: {source}")]
    Transform {
        id: String,
        #[source]
        source: TransformError,
    },

    #[error("Shape for `{0}` has no measurable bounding box")]
    MissingGeometry(Id),

    #[error("Invalid path data on `{id}`: {reason}")]
    InvalidPath { id: Id, reason: String },

    #[error("Missing SVG element for `{0}`")]
    Binding(Id),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("No diagram is loaded")]
    NoDiagram,

    #[error("A diagram is still being loaded")]
    LoadInProgress,
}

impl CellDLError {
    /// Create a new `Transform` error for the shape or object named `id`.
    pub fn new_transform_error(id: impl Into<String>, source: TransformError) -> Self {
        Self::Transform {
            id: id.into(),
            source,
        }
    }
}
