#![forbid(unsafe_code)]

//! Command-line driver for the vtodo windowed list.

pub mod cli;
pub mod error;
pub mod render;
pub mod script;

pub use cli::{run, run_from_env};
pub use error::{DemoError, Result};
