//! usagedash: client side of a customer usage analytics dashboard.
//!
//! The workspace is split into:
//!
//! * `usagedash-core`: configuration, errors, tracing setup
//! * `usagedash-protocol`: wire types of the analytics API
//! * `usagedash-client`: HTTP client and the [`QueryBackend`] seam
//! * `usagedash-engine`: filter state, debounced search sessions, overview
//! * `usagedash-cli`: the `usagedash` binary
//!
//! This crate re-exports the pieces needed to embed a dashboard session.

pub use usagedash_client::{ApiClient, ApiError, QueryBackend};
pub use usagedash_core::{DashboardConfig, UsageDashError};
pub use usagedash_engine::{
    effective_filters, load_overview, view, Debouncer, FilterState, Overview, OverviewState,
    SearchSession, SearchSnapshot, SessionConfig,
};
pub use usagedash_protocol::prelude;
