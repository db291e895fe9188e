#![forbid(unsafe_code)]

use thiserror::Error;

use vtodo::{ConfigError, MetricsError};

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid viewport: {0}")]
    Metrics(#[from] MetricsError),

    #[error("session error: {0}")]
    Session(#[from] vtodo::Error),

    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::Metrics(_) => 2,
            Self::Config(_) | Self::Session(_) => 3,
            Self::Script { .. } => 4,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
