use serde::Serialize;
use tracing::{debug, warn};
use usagedash_client::QueryBackend;
use usagedash_protocol::prelude::{AvailableFilters, DashboardSummary};

/// Summary plus the filter options derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub summary: DashboardSummary,
    pub available_filters: AvailableFilters,
}

impl Overview {
    pub fn from_summary(summary: DashboardSummary) -> Self {
        let available_filters = AvailableFilters::from_summary(&summary);
        Self {
            summary,
            available_filters,
        }
    }

    /// Highest-count event type; ties go to the alphabetically first name.
    pub fn top_event_type(&self) -> Option<(&str, u64)> {
        self.summary.top_event_type()
    }
}

/// Outcome of loading the dashboard overview. A failure replaces the whole
/// overview; there is no partial rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum OverviewState {
    Ready(Overview),
    Failed(String),
}

impl OverviewState {
    pub fn overview(&self) -> Option<&Overview> {
        match self {
            OverviewState::Ready(overview) => Some(overview),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OverviewState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

pub async fn load_overview(backend: &dyn QueryBackend) -> OverviewState {
    match backend.summary().await {
        Ok(summary) => {
            debug!(
                total_events = summary.total_events,
                companies = summary.unique_companies,
                "overview loaded"
            );
            OverviewState::Ready(Overview::from_summary(summary))
        }
        Err(err) => {
            warn!(error = %err, "failed to load overview");
            OverviewState::Failed(err.to_string())
        }
    }
}
