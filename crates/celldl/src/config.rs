//! Configuration types for the CellDL viewer.
//!
//! These structures control the styling constants the viewer uses when it
//! computes geometry and the thresholds it uses to interpret pointer input.
//! All types implement [`serde::Deserialize`] so a host can load them from a
//! TOML file with [`ViewerConfig::load`].
//!
//! # Overview
//!
//! - [`ViewerConfig`] - Top-level configuration combining style and interaction settings.
//! - [`StyleConfig`] - Stroke widths and paddings used for connector attachment and selection.
//! - [`InteractionConfig`] - Click discrimination and zoom limits.
//!
//! # Example
//!
//! ```
//! # use celldl::config::ViewerConfig;
//! let config = ViewerConfig::default();
//! assert_eq!(config.style().connection_width(), 2.0);
//! assert_eq!(config.interaction().max_click_time_ms(), 200);
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use serde::Deserialize;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewerConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Interaction configuration section.
    #[serde(default)]
    interaction: InteractionConfig,
}

impl ViewerConfig {
    pub fn new(style: StyleConfig, interaction: InteractionConfig) -> Self {
        Self { style, interaction }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the interaction configuration.
    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }

    /// Loads configuration from a TOML file.
    ///
    /// Sections and fields missing from the file take their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File doesn't exist
    /// - File cannot be read
    /// - TOML parsing fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        info!(path = path.display().to_string(); "Loading viewer configuration");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Styling constants, in pixels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Stroke width of rendered connections.
    connection_width: f64,

    /// Stroke width of selection outlines.
    selection_stroke_width: f64,

    /// Spacing between splayed connections leaving one side of a shape.
    connection_splay_padding: f64,

    /// Upper limit on padding given as a fraction of a shape's size.
    max_connection_splay_padding: f64,

    /// Radius of the selection mark drawn at a conduit's centre.
    conduit_selection_radius: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            connection_width: 2.0,
            selection_stroke_width: 3.0,
            connection_splay_padding: 16.0,
            max_connection_splay_padding: 20.0,
            conduit_selection_radius: 9.0,
        }
    }
}

impl StyleConfig {
    pub fn connection_width(&self) -> f64 {
        self.connection_width
    }

    pub fn selection_stroke_width(&self) -> f64 {
        self.selection_stroke_width
    }

    pub fn connection_splay_padding(&self) -> f64 {
        self.connection_splay_padding
    }

    pub fn max_connection_splay_padding(&self) -> f64 {
        self.max_connection_splay_padding
    }

    pub fn conduit_selection_radius(&self) -> f64 {
        self.conduit_selection_radius
    }

    /// Gap kept between a shape's corners and the ends of its connections.
    pub fn corner_gap(&self) -> f64 {
        self.connection_width / 2.0 - self.selection_stroke_width / 2.0
    }
}

/// Pointer-handling thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Longest pointer-down to click interval, in milliseconds, that counts as a click.
    max_click_time_ms: u64,

    /// Pointer movement, in pixels, beyond which a press is a pan rather than a click.
    click_tolerance: f64,

    min_zoom: f64,
    max_zoom: f64,

    /// Scale factor applied per zoom step.
    zoom_step: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_click_time_ms: 200,
            click_tolerance: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            zoom_step: 1.1,
        }
    }
}

impl InteractionConfig {
    pub fn max_click_time_ms(&self) -> u64 {
        self.max_click_time_ms
    }

    pub fn click_tolerance(&self) -> f64 {
        self.click_tolerance
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub fn zoom_step(&self) -> f64 {
        self.zoom_step
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.style().selection_stroke_width(), 3.0);
        assert_eq!(config.style().conduit_selection_radius(), 9.0);
        assert_eq!(config.style().corner_gap(), -0.5);
        assert_eq!(config.interaction().click_tolerance(), 1.0);
        assert_eq!(config.interaction().max_zoom(), 10.0);
    }

    #[test]
    fn test_partial_toml() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [style]
            connection_width = 4.0

            [interaction]
            max_click_time_ms = 300
            "#,
        )
        .unwrap();
        assert_eq!(config.style().connection_width(), 4.0);
        assert_eq!(config.style().selection_stroke_width(), 3.0);
        assert_eq!(config.interaction().max_click_time_ms(), 300);
        assert_eq!(config.interaction().zoom_step(), 1.1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[style]\nselection_stroke_width = 5.0").unwrap();

        let config = ViewerConfig::load(file.path()).unwrap();
        assert_eq!(config.style().selection_stroke_width(), 5.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewerConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[style\nconnection_width = ").unwrap();

        let err = ViewerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
