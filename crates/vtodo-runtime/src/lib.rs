#![forbid(unsafe_code)]

//! vtodo Runtime
//!
//! State ownership and mutation discipline for the todo list.
//!
//! # Key Components
//!
//! - [`Action`] / [`reduce`] - Typed mutations and the pure reducer
//! - [`TodoStore`] - Canonical state with a single `dispatch` entry point
//! - [`TodoActions`] - Insert/remove/toggle callbacks with stable identity
//! - [`Observable`] - Version-tracked cell the store publishes through
//! - [`SharedStore`] - Single-writer, lock-free-read store for threaded hosts
//! - [`ListConfig`] - Viewport, cache, and seed tuning loaded at startup
//!
//! # How it fits in the system
//! Host events enter through [`TodoActions`], become [`Action`]s, and are
//! applied by [`TodoStore::dispatch`]. Every change publishes a new
//! immutable `TodoList` snapshot; the widget layer reads snapshots and never
//! writes them.

pub mod action;
pub mod actions;
pub mod config;
pub mod reactive;
pub mod shared;
pub mod store;

pub use action::{Action, ActionKind, NoopReason, Reduced, reduce};
pub use actions::TodoActions;
pub use config::{ConfigError, ListConfig};
pub use reactive::{Observable, Subscription};
pub use shared::SharedStore;
pub use store::TodoStore;
