use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::event::UsageEvent;
use super::nullable::null_as_default;

/// One page of search results plus the counts needed to describe it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<UsageEvent>,
    pub total_count: u64,
    pub filtered_count: u64,
}

/// Violations of `events.len() <= filtered_count <= total_count`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("page holds {page} events but only {filtered} matched the filters")]
    PageExceedsFiltered { page: u64, filtered: u64 },
    #[error("{filtered} filtered events exceed the {total} events in total")]
    FilteredExceedsTotal { filtered: u64, total: u64 },
}

impl FilteredResults {
    pub fn page_len(&self) -> u64 {
        self.events.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether the counts narrow down from the full universe.
    pub fn is_narrowed(&self) -> bool {
        self.total_count != self.filtered_count
    }

    /// Checks the count invariant. The search session does not enforce it;
    /// this exists for validating responses at ingestion.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        if self.page_len() > self.filtered_count {
            return Err(ConsistencyError::PageExceedsFiltered {
                page: self.page_len(),
                filtered: self.filtered_count,
            });
        }
        if self.filtered_count > self.total_count {
            return Err(ConsistencyError::FilteredExceedsTotal {
                filtered: self.filtered_count,
                total: self.total_count,
            });
        }
        Ok(())
    }
}
