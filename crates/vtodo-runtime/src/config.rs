#![forbid(unsafe_code)]

//! Startup tuning for the list: row geometry, overscan, cache slack, and the
//! bulk seed size.
//!
//! # Loading
//!
//! ```toml
//! # vtodo.toml
//! item_extent = 57.0
//! viewport_extent = 513.0
//! overscan = 2
//! cache_slack = 4
//! bulk_count = 2500
//! ```
//!
//! ```rust,ignore
//! let config = ListConfig::load_toml_file("vtodo.toml")?;
//! let config = ListConfig::from_json_str(json)?;
//! ```
//!
//! Missing keys fall back to [`ListConfig::default`]. The `from_*` parsers
//! only parse; the `load_*` helpers also run [`ListConfig::validate`].

#[cfg(feature = "list-config")]
use std::path::Path;

#[cfg(feature = "list-config")]
use serde::{Deserialize, Serialize};

use vtodo_core::{MetricsError, ViewportMetrics};

/// List tuning parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "list-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "list-config", serde(default))]
pub struct ListConfig {
    /// Height of every row.
    pub item_extent: f64,
    /// Initial viewport height.
    pub viewport_extent: f64,
    /// Extra rows materialized past each visible edge.
    pub overscan: usize,
    /// Descriptor cache headroom beyond the rendered window.
    pub cache_slack: usize,
    /// Items generated by the bulk seed.
    pub bulk_count: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            item_extent: 57.0,
            viewport_extent: 513.0,
            overscan: 0,
            cache_slack: 4,
            bulk_count: 2500,
        }
    }
}

impl ListConfig {
    /// Parse TOML.
    #[cfg(feature = "list-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Parse a TOML file.
    #[cfg(feature = "list-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse JSON.
    #[cfg(feature = "list-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Parse a JSON file.
    #[cfg(feature = "list-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a TOML file.
    #[cfg(feature = "list-config")]
    pub fn load_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)?.validated()
    }

    /// Parse and validate a JSON file.
    #[cfg(feature = "list-config")]
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_file(path)?.validated()
    }

    /// Serialize to pretty TOML.
    #[cfg(feature = "list-config")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every field. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.item_extent.is_finite() && self.item_extent > 0.0) {
            errors.push(format!(
                "item_extent must be finite and > 0, got {}",
                self.item_extent
            ));
        }

        if !(self.viewport_extent.is_finite() && self.viewport_extent > 0.0) {
            errors.push(format!(
                "viewport_extent must be finite and > 0, got {}",
                self.viewport_extent
            ));
        }

        errors
    }

    /// `self`, or every validation message.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Viewport metrics for this geometry at `scroll_offset`.
    pub fn to_metrics(&self, scroll_offset: f64) -> Result<ViewportMetrics, MetricsError> {
        ViewportMetrics::new(scroll_offset, self.viewport_extent, self.item_extent)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failure to load a [`ListConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "list-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "list-config")]
    Json(serde_json::Error),
    /// Parsed, but out of range.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "list-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "list-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "list-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "list-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
