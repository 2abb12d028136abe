//! Page type for one fetched slice of the dataset.

use super::Item;
use super::ItemId;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// One page of the dataset with pagination information.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::{Item, Page};
///
/// let page = Page::new(2, vec![Item::new(13), Item::new(14)], 100);
/// assert_eq!(page.number(), 2);
/// assert_eq!(page.page_count(12), 9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    number: u32,
    items: Vec<Item>,
    total_count: u64,
}

impl Page {
    /// Creates a page from its 1-based number, items, and the dataset total.
    pub fn new(number: u32, items: Vec<Item>, total_count: u64) -> Self {
        Self {
            number,
            items,
            total_count,
        }
    }

    /// Creates an empty placeholder page, used before the first load lands.
    pub fn empty(number: u32) -> Self {
        Self::new(number, Vec::new(), 0)
    }

    /// Returns the 1-based page number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the items in page order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Consumes the page and returns the items.
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    /// Returns the ids in page order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(|item| &item.id)
    }

    /// Returns the total number of items in the dataset.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the number of pages of `page_size` needed for the dataset.
    ///
    /// Always at least 1 so that page 1 stays addressable for an empty set.
    pub fn page_count(&self, page_size: usize) -> u32 {
        page_count(self.total_count, page_size)
    }

    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Number of pages of `page_size` rows covering `total` rows, at least 1.
pub fn page_count(total: u64, page_size: usize) -> u32 {
    let size = page_size.max(1) as u64;
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
