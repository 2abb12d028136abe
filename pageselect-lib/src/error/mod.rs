//! Error types

mod fetch;
mod input;

pub use fetch::*;
pub use input::*;

/// Top-level error for front-ends that surface both failure families.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A bulk-select count was rejected before reaching the reconciler.
    #[error(transparent)]
    InvalidBulkCount(#[from] InvalidBulkCount),
}
