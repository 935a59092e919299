//! Error types module
//!
//! `AppError` covers the fallible core helpers (GP task URLs, upload
//! responses, job parameters). Form validation never returns it: validation
//! always yields a `ValidationResult`.

/// Level an operator-facing error is logged at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Bad user input, expected in normal use
    Debug,
    /// Misconfiguration or a failure the operator can act on
    Warn,
    /// Unexpected failure
    Error,
}

/// How an error is reported on the operator surface (the CLI).
pub trait ErrorMetadata {
    /// Stable machine-readable code, e.g. "INVALID_INPUT"
    fn error_code(&self) -> &'static str;

    /// Whether running the same command again may succeed
    fn is_recoverable(&self) -> bool;

    fn client_message(&self) -> String;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Configuration(msg) | AppError::InvalidInput(msg) => msg.clone(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Configuration(_) => LogLevel::Warn,
            AppError::InvalidInput(_) => LogLevel::Debug,
        }
    }
}
