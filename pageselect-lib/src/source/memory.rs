//! In-memory page source.

use std::collections::HashSet;
use std::sync::RwLock;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;

use super::PageSource;
use crate::error::FetchError;
use crate::model::DEFAULT_PAGE_SIZE;
use crate::model::Item;
use crate::model::Page;

/// A page source over a fixed list of items.
///
/// Slices the list into pages of `page_size`. Pages past the end come back
/// empty with the real total, like a REST endpoint would. Latency and
/// per-page failures can be injected to exercise loading and error paths.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::Item;
/// use pageselect_lib::source::InMemoryPageSource;
///
/// let items: Vec<Item> = (1..=30).map(Item::new).collect();
/// let source = InMemoryPageSource::new(items, 12);
/// assert_eq!(source.len(), 30);
/// ```
#[derive(Debug)]
pub struct InMemoryPageSource {
    items: Vec<Item>,
    page_size: usize,
    latency: Option<Duration>,
    failing: RwLock<HashSet<u32>>,
    fetches: AtomicUsize,
}

impl InMemoryPageSource {
    /// Creates a source serving `items` in pages of `page_size`.
    pub fn new(items: Vec<Item>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            latency: None,
            failing: RwLock::new(HashSet::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Creates a source of `total` generated artwork-like rows.
    pub fn sample(total: usize, page_size: usize) -> Self {
        let items = (1..=total)
            .map(|n| {
                let n = n as i64;
                Item::new(n)
                    .with_field("title", format!("Untitled No. {}", n))
                    .with_field("place_of_origin", ORIGINS[n as usize % ORIGINS.len()])
                    .with_field("artist_display", format!("Artist {}", (n * 7) % 31 + 1))
                    .with_field("inscriptions", serde_json::Value::Null)
                    .with_field("date_start", 1800 + (n * 13) % 200)
                    .with_field("date_end", 1800 + (n * 13) % 200 + n % 5)
            })
            .collect();
        Self::new(items, page_size)
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes fetches of `page` fail (or succeed again) with an HTTP 503.
    pub fn set_failing(&self, page: u32, failing: bool) {
        if let Ok(mut guard) = self.failing.write() {
            if failing {
                guard.insert(page);
            } else {
                guard.remove(&page);
            }
        }
    }

    /// Returns the number of fetches served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Returns the configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the number of items in the dataset.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn is_failing(&self, page: u32) -> bool {
        self.failing
            .read()
            .map(|g| g.contains(&page))
            .unwrap_or(false)
    }
}

impl Default for InMemoryPageSource {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_PAGE_SIZE)
    }
}

const ORIGINS: &[&str] = &["France", "Japan", "United States", "Netherlands", "Italy"];

#[async_trait]
impl PageSource for InMemoryPageSource {
    async fn fetch(&self, page: u32) -> Result<Page, FetchError> {
        if page == 0 {
            return Err(FetchError::InvalidPage(page));
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.is_failing(page) {
            return Err(FetchError::http(503, "Service Unavailable"));
        }

        let start = (page as usize - 1).saturating_mul(self.page_size);
        let items = self
            .items
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        Ok(Page::new(page, items, self.items.len() as u64))
    }
}
