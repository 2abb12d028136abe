//! Table controller
//!
//! Owns the current page, the selection, and the loading state, and applies
//! the three user events (page change, manual toggle, bulk select) one at a
//! time.

use std::mem;

use log::debug;
use log::info;
use log::warn;

use crate::error::FetchError;
use crate::error::InvalidBulkCount;
use crate::model::DEFAULT_PAGE_SIZE;
use crate::model::Item;
use crate::model::ItemId;
use crate::model::Page;
use crate::model::page_count;
use crate::selection::SelectionStore;
use crate::selection::clamp_to_dataset;
use crate::selection::on_bulk_select_request;
use crate::selection::on_page_advance;
use crate::source::PageSource;

/// Controller configuration.
///
/// # Example
///
/// ```
/// use pageselect_lib::ControllerConfig;
///
/// let config = ControllerConfig::default().with_page_size(25);
/// assert_eq!(config.page_size, 25);
/// ```
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Rows per page, used to compute the page count for navigation.
    ///
    /// Default: 12
    pub page_size: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ControllerConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// A page load handed out by the controller.
///
/// The ticket identifies the request; only the most recent ticket is
/// accepted by [`TableController::complete_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page to fetch.
    pub page: u32,
    /// Monotonically increasing request tag.
    pub ticket: u64,
}

/// Loading state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// A page is shown and events are accepted.
    Idle,
    /// A fetch is in flight; only page changes are accepted.
    Loading(PageRequest),
}

/// What happened to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The event was applied.
    Applied,
    /// The event was dropped because a page load is in flight.
    Busy,
    /// A fetch result arrived for a superseded request and was discarded.
    Stale,
    /// The fetch failed; the previous page stays current.
    Failed,
}

impl Dispatch {
    /// Returns `true` if the event changed controller state.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Parses a bulk-select count typed by the user.
///
/// # Example
///
/// ```
/// use pageselect_lib::parse_bulk_count;
/// use pageselect_lib::error::InvalidBulkCount;
///
/// assert_eq!(parse_bulk_count(" 15 "), Ok(15));
/// assert_eq!(parse_bulk_count("0"), Err(InvalidBulkCount::NonPositive(0)));
/// assert!(matches!(parse_bulk_count("ten"), Err(InvalidBulkCount::NotNumeric(_))));
/// ```
pub fn parse_bulk_count(text: &str) -> Result<u64, InvalidBulkCount> {
    let text = text.trim();
    let count: i64 = text
        .parse()
        .map_err(|_| InvalidBulkCount::NotNumeric(text.to_string()))?;
    validate_bulk_count(count)
}

fn validate_bulk_count(count: i64) -> Result<u64, InvalidBulkCount> {
    u64::try_from(count)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(InvalidBulkCount::NonPositive(count))
}

/// Drives page loads and keeps the selection consistent across pages.
///
/// The controller starts in [`LoadState::Loading`] for page 1. Front-ends
/// either await [`start`](Self::start) / [`change_page`](Self::change_page),
/// or run fetches themselves with [`request_page`](Self::request_page) and
/// hand the outcome back through [`complete_page`](Self::complete_page).
///
/// # Example
///
/// ```
/// use pageselect_lib::{ControllerConfig, TableController};
/// use pageselect_lib::source::InMemoryPageSource;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let source = InMemoryPageSource::sample(100, 12);
/// let mut table = TableController::new(source, ControllerConfig::default());
/// table.start().await;
///
/// table.bulk_select_submitted(15).unwrap();
/// assert_eq!(table.selection().len(), 12);
/// assert_eq!(table.selection().carry_over(), 3);
///
/// table.change_page(2).await;
/// assert_eq!(table.selection().len(), 15);
/// # });
/// ```
pub struct TableController<S> {
    source: S,
    config: ControllerConfig,
    page: Page,
    store: SelectionStore,
    state: LoadState,
    last_ticket: u64,
    last_error: Option<FetchError>,
    /// Dataset size reported by the last successful fetch.
    known_total: Option<u64>,
}

impl<S: PageSource> TableController<S> {
    /// Creates a controller that is loading page 1.
    pub fn new(source: S, config: ControllerConfig) -> Self {
        let initial = PageRequest { page: 1, ticket: 1 };
        Self {
            source,
            config,
            page: Page::empty(1),
            store: SelectionStore::new(),
            state: LoadState::Loading(initial),
            last_ticket: initial.ticket,
            last_error: None,
            known_total: None,
        }
    }

    /// Performs the initial page load, if it is still pending.
    pub async fn start(&mut self) -> Dispatch {
        match self.state {
            LoadState::Loading(request) => {
                let result = self.source.fetch(request.page).await;
                self.complete_page(request, result)
            }
            LoadState::Idle => Dispatch::Applied,
        }
    }

    /// Fetches `page` and applies it.
    pub async fn change_page(&mut self, page: u32) -> Dispatch {
        let request = self.request_page(page);
        let result = self.source.fetch(request.page).await;
        self.complete_page(request, result)
    }

    /// Starts loading `page` and returns the request to fetch.
    ///
    /// Any load already in flight is superseded: its result will be
    /// discarded when it arrives.
    pub fn request_page(&mut self, page: u32) -> PageRequest {
        self.last_ticket += 1;
        let request = PageRequest {
            page,
            ticket: self.last_ticket,
        };

        if let LoadState::Loading(pending) = self.state {
            debug!(
                "page {} (ticket {}) supersedes page {} (ticket {})",
                request.page, request.ticket, pending.page, pending.ticket
            );
        } else {
            debug!("loading page {} (ticket {})", request.page, request.ticket);
        }

        self.state = LoadState::Loading(request);
        request
    }

    /// Requests the page after the current one, unless already on the last.
    ///
    /// Unbounded until a fetch has reported the dataset size.
    pub fn next_page(&mut self) -> Option<PageRequest> {
        let target = self.target_page().saturating_add(1);
        if self.known_total.is_some() && target > self.page_count() {
            return None;
        }
        Some(self.request_page(target))
    }

    /// Requests the page before the current one, unless already on the first.
    pub fn previous_page(&mut self) -> Option<PageRequest> {
        let target = self.target_page().saturating_sub(1);
        if target == 0 {
            return None;
        }
        Some(self.request_page(target))
    }

    /// Applies the outcome of a fetch started by [`request_page`](Self::request_page).
    ///
    /// Results for anything but the latest request are discarded. A failure
    /// ends loading and leaves page and selection untouched.
    pub fn complete_page(
        &mut self,
        request: PageRequest,
        result: Result<Page, FetchError>,
    ) -> Dispatch {
        match self.state {
            LoadState::Loading(pending) if pending == request => {}
            _ => {
                debug!(
                    "discarding stale result for page {} (ticket {})",
                    request.page, request.ticket
                );
                return Dispatch::Stale;
            }
        }
        self.state = LoadState::Idle;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!("failed to load page {}: {}", request.page, e);
                self.last_error = Some(e);
                return Dispatch::Failed;
            }
        };
        self.last_error = None;
        self.known_total = Some(page.total_count());

        let reconciled = on_page_advance(page.items(), mem::take(&mut self.store));
        self.store = self.clamp(reconciled.store);

        if !reconciled.added.is_empty() {
            info!(
                "page {}: auto-selected {} rows, {} still owed",
                request.page,
                reconciled.added.len(),
                self.store.carry_over()
            );
        }

        self.page = page;
        Dispatch::Applied
    }

    /// Flips the selection of one row.
    ///
    /// Works for any id, on the current page or not. Never changes the
    /// carry-over.
    pub fn manual_toggle(&mut self, id: ItemId) -> Dispatch {
        if self.is_loading() {
            debug!("dropping toggle of {} while loading", id);
            return Dispatch::Busy;
        }
        let selected = self.store.toggle(id.clone());
        debug!("toggled {} -> {}", id, if selected { "selected" } else { "unselected" });
        Dispatch::Applied
    }

    /// Asks for `count` rows to be selected in total.
    ///
    /// Rows on the current page are taken immediately; the rest are owed by
    /// the pages visited next.
    pub fn bulk_select_submitted(&mut self, count: i64) -> Result<Dispatch, InvalidBulkCount> {
        let target = validate_bulk_count(count)?;
        Ok(self.bulk_select(target))
    }

    /// Like [`bulk_select_submitted`](Self::bulk_select_submitted), parsing
    /// the count from user text.
    pub fn bulk_select_text(&mut self, text: &str) -> Result<Dispatch, InvalidBulkCount> {
        let target = parse_bulk_count(text)?;
        Ok(self.bulk_select(target))
    }

    fn bulk_select(&mut self, target: u64) -> Dispatch {
        if self.is_loading() {
            debug!("dropping bulk select of {} while loading", target);
            return Dispatch::Busy;
        }

        let reconciled =
            on_bulk_select_request(target, self.page.items(), mem::take(&mut self.store));
        self.store = self.clamp(reconciled.store);

        info!(
            "bulk select {}: {} rows taken from page {}, {} owed by later pages",
            target,
            reconciled.added.len(),
            self.page.number(),
            self.store.carry_over()
        );
        Dispatch::Applied
    }

    /// Drops every selection and any pending carry-over.
    pub fn clear_selection(&mut self) -> Dispatch {
        if self.is_loading() {
            return Dispatch::Busy;
        }
        self.store.clear();
        Dispatch::Applied
    }

    /// Returns the read model for rendering.
    pub fn view(&self) -> TableView<'_> {
        TableView {
            items: self.page.items(),
            selection: &self.store,
            is_loading: self.is_loading(),
            total_count: self.page.total_count(),
            page: self.page.number(),
            page_count: self.page_count(),
            last_error: self.last_error.as_ref(),
        }
    }

    /// Returns the current selection.
    pub fn selection(&self) -> &SelectionStore {
        &self.store
    }

    /// Returns the page currently shown.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Returns the loading state.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Returns `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading(_))
    }

    /// Returns the error of the last failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Returns the page source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Caps carry-over by the rows left in the dataset, once its size is known.
    fn clamp(&self, store: SelectionStore) -> SelectionStore {
        match self.known_total {
            Some(total) => clamp_to_dataset(store, total),
            None => store,
        }
    }

    fn page_count(&self) -> u32 {
        page_count(self.page.total_count(), self.config.page_size)
    }

    /// Page navigation is relative to: the pending page while loading.
    fn target_page(&self) -> u32 {
        match self.state {
            LoadState::Loading(request) => request.page,
            LoadState::Idle => self.page.number(),
        }
    }
}

impl<S> std::fmt::Debug for TableController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableController")
            .field("page", &self.page.number())
            .field("state", &self.state)
            .field("selected", &self.store.len())
            .field("carry_over", &self.store.carry_over())
            .finish()
    }
}

/// Read model of the table for any UI layer.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    /// Items of the current page, in order.
    pub items: &'a [Item],
    /// The whole selection, across pages.
    pub selection: &'a SelectionStore,
    /// `true` while a fetch is in flight.
    pub is_loading: bool,
    /// Number of items in the dataset.
    pub total_count: u64,
    /// 1-based number of the page shown.
    pub page: u32,
    /// Number of pages at the configured page size.
    pub page_count: u32,
    /// Error of the last failed fetch, if the latest load failed.
    pub last_error: Option<&'a FetchError>,
}

impl<'a> TableView<'a> {
    /// Check if an item is selected.
    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selection.contains(id)
    }

    /// Ids of the current page that are selected, in page order.
    pub fn selected_on_page(&self) -> Vec<&'a ItemId> {
        let selection = self.selection;
        self.items
            .iter()
            .map(|item| &item.id)
            .filter(|id| selection.contains(id))
            .collect()
    }

    /// Number of selected ids across all pages.
    pub fn selected_total(&self) -> usize {
        self.selection.len()
    }

    /// Rows still owed from the last bulk request.
    pub fn carry_over(&self) -> u64 {
        self.selection.carry_over()
    }
}
