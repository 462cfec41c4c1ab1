//! Scripted in-memory backend shared by the engine tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use usagedash_client::{ApiError, QueryBackend};
use usagedash_protocol::prelude::{
    DashboardSummary, ExportFile, ExportRequest, FilterParams, FilteredResults, UsageEvent,
};

pub(crate) const DEFAULT_LATENCY: Duration = Duration::from_millis(10);

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub searches: Mutex<Vec<FilterParams>>,
    pub exports: Mutex<Vec<ExportRequest>>,
    pub completed_searches: AtomicUsize,
    latencies: Mutex<VecDeque<Duration>>,
    fail_searches: AtomicBool,
    fail_exports: AtomicBool,
    summary: Mutex<Option<DashboardSummary>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latencies handed out to the next searches, in order.
    pub fn with_latencies(self, latencies: impl IntoIterator<Item = Duration>) -> Self {
        self.latencies.lock().extend(latencies);
        self
    }

    pub fn with_summary(self, summary: DashboardSummary) -> Self {
        *self.summary.lock() = Some(summary);
        self
    }

    pub fn fail_searches(&self, fail: bool) {
        self.fail_searches.store(fail, Ordering::SeqCst);
    }

    pub fn fail_exports(&self, fail: bool) {
        self.fail_exports.store(fail, Ordering::SeqCst);
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().len()
    }

    pub fn last_search(&self) -> Option<FilterParams> {
        self.searches.lock().last().cloned()
    }
}

/// One page containing a single event tagged with the filters it answers.
pub(crate) fn page_for(filters: &FilterParams) -> FilteredResults {
    let company = filters
        .company_ids
        .as_ref()
        .and_then(|ids| ids.first().cloned())
        .unwrap_or_else(|| "acme".to_string());
    let search = filters.search_text.clone().unwrap_or_default();

    FilteredResults {
        events: vec![usage_event(
            &format!("evt-{}-{}", filters.offset(), search),
            &company,
        )],
        total_count: 12,
        filtered_count: 10,
    }
}

pub(crate) fn usage_event(id: &str, company_id: &str) -> UsageEvent {
    let created_at = Utc
        .with_ymd_and_hms(2025, 5, 20, 9, 15, 0)
        .single()
        .expect("valid timestamp");
    UsageEvent {
        id: id.to_string(),
        created_at,
        company_id: company_id.to_string(),
        event_type: "Action".to_string(),
        content: format!("User login - {company_id}"),
        attribute: "UserLogin".to_string(),
        value: String::new(),
        updated_at: Some(created_at),
        original_timestamp: None,
    }
}

fn unreachable_backend() -> ApiError {
    ApiError::Http("connection refused".to_string())
}

#[async_trait]
impl QueryBackend for FakeBackend {
    async fn summary(&self) -> Result<DashboardSummary, ApiError> {
        tokio::time::sleep(DEFAULT_LATENCY).await;
        self.summary.lock().clone().ok_or_else(unreachable_backend)
    }

    async fn search(&self, filters: &FilterParams) -> Result<FilteredResults, ApiError> {
        self.searches.lock().push(filters.clone());
        let latency = self
            .latencies
            .lock()
            .pop_front()
            .unwrap_or(DEFAULT_LATENCY);
        tokio::time::sleep(latency).await;
        self.completed_searches.fetch_add(1, Ordering::SeqCst);

        if self.fail_searches.load(Ordering::SeqCst) {
            return Err(unreachable_backend());
        }
        Ok(page_for(filters))
    }

    async fn export(&self, request: &ExportRequest) -> Result<ExportFile, ApiError> {
        self.exports.lock().push(request.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;

        if self.fail_exports.load(Ordering::SeqCst) {
            return Err(unreachable_backend());
        }
        Ok(ExportFile {
            filename: request.format.default_filename(),
            bytes: b"ID,Created At\n".to_vec(),
        })
    }
}
