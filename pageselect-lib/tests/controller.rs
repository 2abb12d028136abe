//! Tests for the table controller: page loads, bulk selection across pages,
//! manual toggles, and stale fetch handling.

use std::sync::Arc;

use pageselect_lib::error::FetchError;
use pageselect_lib::error::InvalidBulkCount;
use pageselect_lib::model::ItemId;
use pageselect_lib::source::InMemoryPageSource;
use pageselect_lib::source::PageSource;
use pageselect_lib::{ControllerConfig, Dispatch, LoadState, TableController};

type Source = Arc<InMemoryPageSource>;

async fn started(total: usize) -> (TableController<Source>, Source) {
    let source = Arc::new(InMemoryPageSource::sample(total, 12));
    let mut table = TableController::new(source.clone(), ControllerConfig::default());
    assert_eq!(table.start().await, Dispatch::Applied);
    (table, source)
}

fn ids(range: std::ops::RangeInclusive<i64>) -> Vec<ItemId> {
    range.map(ItemId::Int).collect()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_starts_loading_page_one() {
    let source = Arc::new(InMemoryPageSource::sample(100, 12));
    let mut table = TableController::new(source.clone(), ControllerConfig::default());

    assert!(table.is_loading());
    assert!(matches!(table.state(), LoadState::Loading(r) if r.page == 1));
    assert_eq!(source.fetch_count(), 0);

    table.start().await;

    let view = table.view();
    assert!(!view.is_loading);
    assert_eq!(view.page, 1);
    assert_eq!(view.items.len(), 12);
    assert_eq!(view.total_count, 100);
    assert_eq!(view.page_count, 9);
    assert!(view.selected_on_page().is_empty());
}

#[tokio::test]
async fn test_failed_initial_load_returns_to_idle() {
    let source = Arc::new(InMemoryPageSource::sample(30, 12));
    source.set_failing(1, true);
    let mut table = TableController::new(source.clone(), ControllerConfig::default());

    assert_eq!(table.start().await, Dispatch::Failed);
    assert_eq!(table.state(), LoadState::Idle);
    assert!(table.page().is_empty());
    assert!(table.last_error().is_some());

    source.set_failing(1, false);
    assert_eq!(table.change_page(1).await, Dispatch::Applied);
    assert_eq!(table.page().len(), 12);
    assert!(table.last_error().is_none());
}

#[tokio::test]
async fn test_bulk_select_before_first_load_is_owed() {
    let source = Arc::new(InMemoryPageSource::sample(100, 12));
    source.set_failing(1, true);
    let mut table = TableController::new(source.clone(), ControllerConfig::default());
    assert_eq!(table.start().await, Dispatch::Failed);

    assert_eq!(table.bulk_select_submitted(7), Ok(Dispatch::Applied));
    assert!(table.selection().is_empty());
    assert_eq!(table.selection().carry_over(), 7);

    source.set_failing(1, false);
    assert_eq!(table.change_page(1).await, Dispatch::Applied);
    assert_eq!(table.selection().len(), 7);
    assert_eq!(table.selection().carry_over(), 0);
    assert_eq!(table.view().selected_on_page(), ids(1..=7).iter().collect::<Vec<_>>());
}

#[tokio::test]
async fn test_next_page_after_failed_initial_load() {
    let source = Arc::new(InMemoryPageSource::sample(30, 12));
    source.set_failing(1, true);
    let mut table = TableController::new(source.clone(), ControllerConfig::default());
    assert_eq!(table.start().await, Dispatch::Failed);

    let request = table.next_page().unwrap();
    assert_eq!(request.page, 2);
    let page = source.fetch(request.page).await;
    assert_eq!(table.complete_page(request, page), Dispatch::Applied);
    assert_eq!(table.view().page_count, 3);

    // Bounded again once the dataset size is known.
    let last = table.next_page().unwrap();
    assert_eq!(last.page, 3);
    assert!(table.next_page().is_none());
}

// =============================================================================
// Bulk selection across pages
// =============================================================================

#[tokio::test]
async fn test_fifteen_rows_over_three_pages() {
    let (mut table, _) = started(100).await;

    assert_eq!(table.bulk_select_submitted(15), Ok(Dispatch::Applied));
    assert_eq!(table.selection().len(), 12);
    assert_eq!(table.selection().carry_over(), 3);
    assert_eq!(table.view().selected_on_page(), ids(1..=12).iter().collect::<Vec<_>>());

    table.change_page(2).await;
    assert_eq!(table.selection().carry_over(), 0);
    assert_eq!(table.view().selected_on_page(), ids(13..=15).iter().collect::<Vec<_>>());

    table.change_page(3).await;
    assert!(table.view().selected_on_page().is_empty());
    assert_eq!(table.selection().len(), 15);
}

#[tokio::test]
async fn test_manual_deselect_is_not_refilled() {
    let (mut table, _) = started(100).await;

    table.bulk_select_submitted(5).unwrap();
    assert_eq!(table.selection().carry_over(), 0);

    assert_eq!(table.manual_toggle(ItemId::Int(3)), Dispatch::Applied);
    assert_eq!(table.selection().len(), 4);

    table.change_page(2).await;
    assert_eq!(table.selection().len(), 4);
    assert!(table.view().selected_on_page().is_empty());
}

#[tokio::test]
async fn test_target_larger_than_dataset() {
    let (mut table, _) = started(30).await;

    table.bulk_select_submitted(500).unwrap();
    assert_eq!(table.selection().len(), 12);
    assert_eq!(table.selection().carry_over(), 18);

    table.change_page(2).await;
    table.change_page(3).await;
    assert_eq!(table.selection().len(), 30);
    assert_eq!(table.selection().carry_over(), 0);
}

#[tokio::test]
async fn test_carry_over_skips_revisited_pages() {
    let (mut table, _) = started(100).await;

    table.bulk_select_submitted(30).unwrap();
    table.change_page(1).await;
    assert_eq!(table.selection().carry_over(), 18);

    table.change_page(5).await;
    assert_eq!(table.view().selected_on_page(), ids(49..=60).iter().collect::<Vec<_>>());
    assert_eq!(table.selection().carry_over(), 6);
}

#[tokio::test]
async fn test_prior_manual_selection_counts_toward_target() {
    let (mut table, _) = started(100).await;

    table.manual_toggle(ItemId::Int(99));
    table.manual_toggle(ItemId::Int(2));
    table.bulk_select_submitted(5).unwrap();

    assert_eq!(table.selection().len(), 5);
    assert_eq!(
        table.view().selected_on_page(),
        vec![&ItemId::Int(1), &ItemId::Int(2), &ItemId::Int(3), &ItemId::Int(4)]
    );
}

#[tokio::test]
async fn test_new_bulk_request_replaces_carry_over() {
    let (mut table, _) = started(100).await;

    table.bulk_select_submitted(40).unwrap();
    assert_eq!(table.selection().carry_over(), 28);

    table.bulk_select_submitted(14).unwrap();
    assert_eq!(table.selection().carry_over(), 2);
    assert_eq!(table.selection().len(), 12);
}

#[tokio::test]
async fn test_invalid_bulk_counts_are_rejected() {
    let (mut table, source) = started(100).await;
    let fetches = source.fetch_count();

    assert_eq!(
        table.bulk_select_submitted(0),
        Err(InvalidBulkCount::NonPositive(0))
    );
    assert_eq!(
        table.bulk_select_submitted(-4),
        Err(InvalidBulkCount::NonPositive(-4))
    );
    assert_eq!(
        table.bulk_select_text("twelve"),
        Err(InvalidBulkCount::NotNumeric("twelve".to_string()))
    );
    assert!(table.selection().is_empty());

    assert_eq!(table.bulk_select_text(" 3 "), Ok(Dispatch::Applied));
    assert_eq!(table.selection().len(), 3);
    assert_eq!(source.fetch_count(), fetches);
}

// =============================================================================
// Manual toggles
// =============================================================================

#[tokio::test]
async fn test_manual_toggle_never_touches_carry_over() {
    let (mut table, _) = started(100).await;

    table.bulk_select_submitted(20).unwrap();
    assert_eq!(table.selection().carry_over(), 8);

    table.manual_toggle(ItemId::Int(1));
    table.manual_toggle(ItemId::Int(77));
    table.manual_toggle(ItemId::from("not-on-any-page"));
    assert_eq!(table.selection().carry_over(), 8);
    assert!(!table.view().is_selected(&ItemId::Int(1)));
    assert!(table.view().is_selected(&ItemId::Int(77)));
}

#[tokio::test]
async fn test_events_dropped_while_loading() {
    let (mut table, _) = started(100).await;
    table.request_page(2);

    assert_eq!(table.manual_toggle(ItemId::Int(1)), Dispatch::Busy);
    assert_eq!(table.bulk_select_submitted(4), Ok(Dispatch::Busy));
    assert_eq!(table.clear_selection(), Dispatch::Busy);
    assert!(table.selection().is_empty());
}

// =============================================================================
// Fetch failures and stale results
// =============================================================================

#[tokio::test]
async fn test_failed_fetch_leaves_state_unchanged() {
    let (mut table, source) = started(100).await;
    table.bulk_select_submitted(20).unwrap();

    let selection = table.selection().clone();
    source.set_failing(2, true);

    assert_eq!(table.change_page(2).await, Dispatch::Failed);
    assert!(!table.is_loading());
    assert_eq!(table.selection(), &selection);
    assert_eq!(table.page().number(), 1);
    assert_eq!(table.view().last_error.and_then(FetchError::status_code), Some(503));

    source.set_failing(2, false);
    table.change_page(2).await;
    assert_eq!(table.selection().len(), 20);
    assert_eq!(table.selection().carry_over(), 0);
}

#[tokio::test]
async fn test_out_of_order_completion_keeps_latest_page() {
    let (mut table, source) = started(100).await;
    table.bulk_select_submitted(14).unwrap();

    let first = table.request_page(2);
    let second = table.request_page(3);
    assert_ne!(first.ticket, second.ticket);

    let third_page = source.fetch(second.page).await;
    assert_eq!(table.complete_page(second, third_page), Dispatch::Applied);

    let second_page = source.fetch(first.page).await;
    assert_eq!(table.complete_page(first, second_page), Dispatch::Stale);

    assert_eq!(table.page().number(), 3);
    assert_eq!(table.view().selected_on_page(), ids(25..=26).iter().collect::<Vec<_>>());
    assert!(!table.selection().contains(&ItemId::Int(13)));
}

#[tokio::test]
async fn test_superseded_failure_is_ignored() {
    let (mut table, source) = started(100).await;
    source.set_failing(2, true);

    let first = table.request_page(2);
    let second = table.request_page(4);

    let failed = source.fetch(first.page).await;
    assert_eq!(table.complete_page(first, failed), Dispatch::Stale);
    assert!(table.is_loading());
    assert!(table.last_error().is_none());

    let ok = source.fetch(second.page).await;
    assert_eq!(table.complete_page(second, ok), Dispatch::Applied);
    assert_eq!(table.page().number(), 4);
}

#[tokio::test]
async fn test_completion_after_idle_is_stale() {
    let (mut table, source) = started(100).await;

    let request = table.request_page(2);
    let page = source.fetch(2).await;
    assert_eq!(table.complete_page(request, page), Dispatch::Applied);

    let replay = source.fetch(2).await;
    assert_eq!(table.complete_page(request, replay), Dispatch::Stale);
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn test_next_and_previous_are_bounded() {
    let (mut table, source) = started(30).await;

    assert!(table.previous_page().is_none());

    let request = table.next_page().unwrap();
    assert_eq!(request.page, 2);
    let page = source.fetch(request.page).await;
    table.complete_page(request, page);

    // Relative to the pending page while a load is in flight.
    let pending = table.next_page().unwrap();
    assert_eq!(pending.page, 3);
    assert!(table.next_page().is_none());

    let page = source.fetch(pending.page).await;
    table.complete_page(pending, page);
    assert_eq!(table.page().number(), 3);
    assert_eq!(table.page().len(), 6);
    assert_eq!(table.previous_page().map(|r| r.page), Some(2));
}

#[tokio::test]
async fn test_clear_selection() {
    let (mut table, _) = started(100).await;
    table.bulk_select_submitted(50).unwrap();

    assert_eq!(table.clear_selection(), Dispatch::Applied);
    assert!(table.selection().is_empty());
    assert_eq!(table.selection().carry_over(), 0);

    table.change_page(2).await;
    assert!(table.selection().is_empty());
}
