//! Usage dashboard engine - debounced filter state, search orchestration and
//! overview loading on top of a [`QueryBackend`](usagedash_client::QueryBackend).

pub mod debounce;
pub mod filters;
pub mod overview;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use debounce::Debouncer;
pub use filters::{effective_filters, FilterState};
pub use overview::{load_overview, Overview, OverviewState};
pub use session::{SearchSession, SearchSnapshot, SessionConfig, DEFAULT_DEBOUNCE};
