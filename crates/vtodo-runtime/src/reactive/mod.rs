#![forbid(unsafe_code)]

//! Change propagation for store snapshots.

pub mod observable;

pub use observable::{Observable, Subscription};
