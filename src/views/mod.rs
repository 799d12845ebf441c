//! Per-page state: the event catalogue and the single-event page.

pub mod catalogue;
pub mod event;
pub mod registry;
pub mod state;

pub use catalogue::{CatalogueState, CatalogueView};
pub use event::{DetailState, EventView, EventViewState, Loadable, NOT_FOUND_MESSAGE};
pub use registry::ViewRegistry;
pub use state::ViewState;
