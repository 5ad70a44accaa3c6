//! Core domain errors.

use thiserror::Error;

/// Validation errors for values sent to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A mandatory value is missing or empty.
    #[error("missing required value: {0}")]
    MissingValue(&'static str),
}
