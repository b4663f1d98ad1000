//! Errors raised while building or querying a tree.

use thiserror::Error;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or searching a [`VPTree`](crate::VPTree).
///
/// All of them are detected before any result is handed back; a failed
/// operation never returns partial results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The point set handed to the builder is unusable (e.g. empty).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A query parameter is out of range (`k == 0`, negative radius).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A point does not have the dimensionality of the indexed set.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of the indexed points.
        expected: usize,
        /// Dimensionality of the offending point.
        actual: usize,
    },

    /// The distance function returned NaN or a negative value.
    #[error("invalid distance: {0}")]
    InvalidDistance(String),
}
