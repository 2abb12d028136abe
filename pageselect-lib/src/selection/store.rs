//! Selected ids plus the bulk-select carry-over counter.

use std::collections::HashSet;

use crate::model::ItemId;

/// Holds the selected item ids and the number of rows still owed from a
/// bulk-select request.
///
/// Plain data: the reconciler decides what to add, manual toggles edit the
/// ids directly and never touch the carry-over.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::ItemId;
/// use pageselect_lib::selection::SelectionStore;
///
/// let mut store = SelectionStore::new();
/// store.add(ItemId::Int(7));
/// store.set_carry_over(-4);
///
/// assert!(store.contains(&ItemId::Int(7)));
/// assert_eq!(store.carry_over(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selected: HashSet<ItemId>,
    carry_over: u64,
}

impl SelectionStore {
    /// Creates an empty store with no carry-over.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id. Returns `true` if it was not selected before.
    pub fn add(&mut self, id: ItemId) -> bool {
        self.selected.insert(id)
    }

    /// Removes an id. Returns `true` if it was selected.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        self.selected.remove(id)
    }

    /// Flips membership of an id and returns whether it is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Check if an id is selected.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.selected.contains(id)
    }

    /// Returns a snapshot of all selected ids.
    pub fn all_ids(&self) -> HashSet<ItemId> {
        self.selected.clone()
    }

    /// Iterates over the selected ids in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.selected.iter()
    }

    /// Returns the number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Sets the carry-over; negative values are clamped to 0.
    pub fn set_carry_over(&mut self, n: i64) {
        self.carry_over = u64::try_from(n).unwrap_or(0);
    }

    /// Returns the number of rows still owed from the last bulk request.
    pub fn carry_over(&self) -> u64 {
        self.carry_over
    }

    pub(crate) fn set_carry_over_unsigned(&mut self, n: u64) {
        self.carry_over = n;
    }

    /// Drops every selection and any pending carry-over.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.carry_over = 0;
    }
}
