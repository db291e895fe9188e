#![forbid(unsafe_code)]

//! Structured logging hooks.
//!
//! With the `tracing` feature the usual macros are re-exported from the
//! crate root so downstream crates can log without naming `tracing`
//! directly. With `tracing-json` a one-call JSON subscriber is available for
//! hosts that ship logs to a collector.
//!
//! Without either feature this module is empty and logging compiles away.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Default filter when `RUST_LOG` is unset.
#[cfg(feature = "tracing-json")]
pub const DEFAULT_FILTER: &str = "info";

/// Install a global JSON subscriber on stderr, filtered by `RUST_LOG` or
/// `default_filter` when unset (an unparsable filter falls back to
/// [`DEFAULT_FILTER`]).
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(default_filter: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .is_ok()
}
