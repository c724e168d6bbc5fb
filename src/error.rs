//! Error types for the lpq library.
//!
//! All fallible operations return [`LpqError`] through the crate-wide
//! [`Result`] alias. Quantization saturation is not an error: out-of-range
//! values are clamped by policy.
//!
//! # Examples
//!
//! ```
//! use lpq::error::{LpqError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LpqError::invalid_argument("vectors must share a dimension"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for lpq operations.
#[derive(Error, Debug)]
pub enum LpqError {
    /// Mismatched dimensions, unknown metric names, ragged batches and
    /// unsupported configuration values.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was called in a state that forbids it, such as building
    /// an index that already holds vectors.
    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),

    /// Worker pool construction failed.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// I/O errors (vector files, report output)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LpqError.
pub type Result<T> = std::result::Result<T, LpqError>;

impl LpqError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LpqError::InvalidArgument(msg.into())
    }

    /// Create a new precondition violation error.
    pub fn precondition<S: Into<String>>(msg: S) -> Self {
        LpqError::PreconditionViolation(msg.into())
    }

    /// Create a new thread pool error.
    pub fn thread_pool<S: Into<String>>(msg: S) -> Self {
        LpqError::ThreadPool(msg.into())
    }

    /// Whether this error reports a caller-supplied argument problem.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LpqError::InvalidArgument(_))
    }

    /// Whether this error reports a violated state precondition.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, LpqError::PreconditionViolation(_))
    }
}
