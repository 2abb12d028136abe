//! Bulk-select input error types

/// A bulk-select count that cannot be submitted.
///
/// Raised before the reconciler runs, so rejecting a count never mutates the
/// selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidBulkCount {
    /// The input was not an integer.
    #[error("'{0}' is not a number")]
    NotNumeric(String),

    /// The count was zero or negative.
    #[error("row count must be positive, got {0}")]
    NonPositive(i64),
}
