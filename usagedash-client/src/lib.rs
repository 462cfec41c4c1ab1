//! Client side of the usage analytics HTTP API.
//!
//! [`ApiClient`] speaks to the `/api/v1` endpoints and unwraps the response
//! envelope; [`QueryBackend`] is the seam the search session is written
//! against, so tests can substitute their own backend.

pub mod backend;
pub mod client;
pub mod disposition;
pub mod error;
pub mod query;

pub use backend::QueryBackend;
pub use client::ApiClient;
pub use error::ApiError;
