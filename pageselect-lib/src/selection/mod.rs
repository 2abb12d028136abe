//! Selection state and the cross-page reconciler.

pub mod reconciler;
mod store;

pub use reconciler::Reconciled;
pub use reconciler::clamp_to_dataset;
pub use reconciler::on_bulk_select_request;
pub use reconciler::on_page_advance;
pub use store::SelectionStore;
