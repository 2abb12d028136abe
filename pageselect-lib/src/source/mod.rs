//! Page sources
//!
//! A [`PageSource`] returns one page of the dataset at a time. The table
//! controller never asks for more than the page it is about to show.

mod http;
mod memory;

pub use http::*;
pub use memory::*;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::Page;

/// Trait for fetching pages of the dataset.
///
/// Implementations must be idempotent for a fixed page number as long as the
/// upstream dataset does not change.
///
/// # Example
///
/// ```ignore
/// use pageselect_lib::source::{HttpPageSource, PageSource};
///
/// let source = HttpPageSource::builder()
///     .url("https://api.artic.edu/api/v1/artworks")
///     .build();
///
/// let page = source.fetch(1).await?;
/// println!("{} of {} items", page.len(), page.total_count());
/// ```
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the 1-based page `page`.
    ///
    /// Returns [`FetchError::InvalidPage`] for page 0 without doing any I/O.
    async fn fetch(&self, page: u32) -> Result<Page, FetchError>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for std::sync::Arc<S> {
    async fn fetch(&self, page: u32) -> Result<Page, FetchError> {
        (**self).fetch(page).await
    }
}
