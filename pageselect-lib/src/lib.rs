//! Cross-page row selection over a server-paginated dataset.
//!
//! The dataset is fetched one page at a time through a [`source::PageSource`]
//! and never held in full. A [`TableController`] drives page loads and keeps a
//! [`selection::SelectionStore`] consistent when the user asks for more rows
//! than fit on the current page.

pub mod error;
pub mod model;
pub mod selection;
pub mod source;

mod controller;

pub use controller::*;
