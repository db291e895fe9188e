#![forbid(unsafe_code)]

//! Core: item model, identity, and viewport windowing.
//!
//! # Role in vtodo
//! `vtodo-core` is the leaf layer. It owns the data model ([`Item`],
//! [`TodoList`]), the id counter ([`IdGenerator`]), and the O(1) windowing
//! math that maps scroll metrics to a [`VisibleRange`].
//!
//! # How it fits in the system
//! The runtime (`vtodo-runtime`) applies mutations to [`TodoList`]
//! snapshots; the widget layer (`vtodo-widgets`) turns a [`VisibleRange`]
//! into row descriptors. Nothing here allocates per frame or touches I/O.

pub mod callback;
pub mod collection;
pub mod id;
pub mod item;
pub mod logging;
pub mod viewport;

pub use callback::{Callback, CallbackId, RowCallbacks};
pub use collection::{TodoList, create_bulk};
pub use id::IdGenerator;
pub use item::{Item, ItemId};
pub use viewport::{
    MetricsError, ViewportMetrics, VisibleRange, content_extent, max_scroll_offset,
    position_offset, visible_count, visible_range,
};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
