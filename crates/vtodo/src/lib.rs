#![forbid(unsafe_code)]

//! vtodo public facade crate.
//!
//! Re-exports the item model, store, and list widgets, and wires them into
//! a single [`TodoApp`] session: one store, one set of stable action
//! callbacks, one scroll state, one row cache.
//!
//! ```
//! use vtodo::prelude::*;
//!
//! let mut app = TodoApp::new(ListConfig::default()).unwrap();
//! let first = app.frame();
//! assert_eq!(first.rows.len(), 10);
//!
//! first.rows[2].toggle();
//! let next = app.frame();
//! assert_eq!(next.built_count(), 1);
//! assert!(next.rows[2].item.checked);
//! ```

use std::fmt;

mod app;

pub use app::TodoApp;

// --- Core re-exports -------------------------------------------------------

pub use vtodo_core::{
    Callback, CallbackId, IdGenerator, Item, ItemId, MetricsError, RowCallbacks, TodoList,
    ViewportMetrics, VisibleRange, create_bulk, visible_range,
};

// --- Runtime re-exports ----------------------------------------------------

pub use vtodo_runtime::{
    Action, ConfigError, ListConfig, Reduced, SharedStore, Subscription, TodoActions, TodoStore,
    reduce,
};

// --- Widget re-exports -----------------------------------------------------

pub use vtodo_widgets::{
    MaterializedRows, MaterializerStats, RenderDescriptor, RowChange, RowMaterializer,
    VirtualizedList,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for vtodo sessions.
#[derive(Debug)]
pub enum Error {
    /// Rejected viewport geometry.
    Metrics(MetricsError),
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metrics(err) => write!(f, "invalid viewport metrics: {err}"),
            Self::Config(err) => write!(f, "configuration error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Metrics(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<MetricsError> for Error {
    fn from(err: MetricsError) -> Self {
        Self::Metrics(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for vtodo APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Action, Error, Item, ItemId, ListConfig, MaterializedRows, RenderDescriptor, Result,
        RowChange, TodoApp, TodoList, ViewportMetrics, VisibleRange,
    };

    pub use crate::{core, runtime, widgets};
}

pub use vtodo_core as core;
pub use vtodo_runtime as runtime;
pub use vtodo_widgets as widgets;
