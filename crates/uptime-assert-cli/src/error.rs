//! CLI error types.

use thiserror::Error;
use uptime_assert::AssertionError;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input could not be read as the expected JSON.
    #[error("invalid input from {origin}: {reason}")]
    Input {
        /// File path, or `<stdin>`.
        origin: String,
        /// What went wrong.
        reason: String,
    },

    /// The assertion engine rejected the input.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
