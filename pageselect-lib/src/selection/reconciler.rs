//! Cross-page bulk selection.
//!
//! A bulk request asks for a total number of selected rows. The rows visible
//! on the current page are taken first; whatever is still owed is kept as the
//! store's carry-over and paid off from pages the user visits later.
//!
//! Both operations take the whole [`SelectionStore`] by value and hand back
//! the updated one, so a caller can never reconcile against a stale copy.

use crate::model::Item;
use crate::model::ItemId;

use super::SelectionStore;

/// Result of a reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The updated selection state.
    pub store: SelectionStore,
    /// Ids selected by this step, in page order.
    pub added: Vec<ItemId>,
}

impl Reconciled {
    fn unchanged(store: SelectionStore) -> Self {
        Self {
            store,
            added: Vec::new(),
        }
    }
}

/// Applies a bulk-select target to the currently visible page.
///
/// The target counts every selected id, including ones selected by hand, so
/// only `target_count - store.len()` new rows are taken. Unselected items are
/// added in page order until that many were added or the page runs out; the
/// shortfall replaces any previous carry-over. Nothing is ever deselected.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::Item;
/// use pageselect_lib::selection::{on_bulk_select_request, SelectionStore};
///
/// let page: Vec<Item> = (1..=12).map(Item::new).collect();
/// let result = on_bulk_select_request(15, &page, SelectionStore::new());
///
/// assert_eq!(result.store.len(), 12);
/// assert_eq!(result.store.carry_over(), 3);
/// ```
pub fn on_bulk_select_request(
    target_count: u64,
    current_page_items: &[Item],
    store: SelectionStore,
) -> Reconciled {
    let already_selected = store.len() as u64;
    let remaining = target_count.saturating_sub(already_selected);

    let (mut store, added) = select_unselected(current_page_items, store, remaining);
    store.set_carry_over_unsigned(remaining - added.len() as u64);

    Reconciled { store, added }
}

/// Pays off the carry-over from a newly visible page.
///
/// With no carry-over this is a no-op, so plain navigation after a satisfied
/// bulk request selects nothing. An empty page also leaves the carry-over
/// intact for a later page.
pub fn on_page_advance(new_page_items: &[Item], store: SelectionStore) -> Reconciled {
    let carry_over = store.carry_over();
    if carry_over == 0 || new_page_items.is_empty() {
        return Reconciled::unchanged(store);
    }

    let (mut store, added) = select_unselected(new_page_items, store, carry_over);
    store.set_carry_over_unsigned(carry_over.saturating_sub(added.len() as u64));

    Reconciled { store, added }
}

/// Caps the carry-over at the number of dataset rows not yet selected.
///
/// A target larger than the dataset would otherwise leave a carry-over that
/// no page can ever pay off. Ids selected by hand from outside the dataset
/// make the cap looser, never tighter.
pub fn clamp_to_dataset(mut store: SelectionStore, total_count: u64) -> SelectionStore {
    let unselected = total_count.saturating_sub(store.len() as u64);
    if store.carry_over() > unselected {
        store.set_carry_over_unsigned(unselected);
    }
    store
}

/// Selects up to `budget` unselected items in page order.
fn select_unselected(
    items: &[Item],
    mut store: SelectionStore,
    budget: u64,
) -> (SelectionStore, Vec<ItemId>) {
    let mut added = Vec::new();
    for item in items {
        if added.len() as u64 >= budget {
            break;
        }
        if store.add(item.id.clone()) {
            added.push(item.id.clone());
        }
    }
    (store, added)
}
