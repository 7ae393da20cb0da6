//! Error types for route planning requests.

use thiserror::Error as ThisError;

/// Failures surfaced to the caller of a planning request.
///
/// Internal route invariants (every route is a permutation of `0..=n`
/// starting at 0) are not represented here: they are asserted in debug
/// builds and covered by the test suite.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Missing start, empty destination set, malformed coordinates or an
    /// out-of-range option selection.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A cost matrix is partial or malformed.
    #[error("{matrix} matrix incomplete: {reason}")]
    MatrixIncomplete {
        matrix: &'static str,
        reason: String,
    },
    /// The matrix or geometry provider could not answer.
    #[error("routing provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// The request was abandoned before it completed.
    #[error("route planning cancelled")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn matrix_incomplete(matrix: &'static str, reason: impl Into<String>) -> Self {
        Self::MatrixIncomplete {
            matrix,
            reason: reason.into(),
        }
    }

    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::ProviderUnavailable(message.into())
    }
}
