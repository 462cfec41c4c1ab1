use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use usagedash_client::{ApiError, QueryBackend};
use usagedash_protocol::prelude::{
    ExportFile, ExportFormat, ExportRequest, FilterParams, FilterPatch, FilteredResults,
    DEFAULT_PAGE_SIZE,
};

use crate::debounce::Debouncer;
use crate::filters::{effective_filters, FilterState};

/// Delay applied to free-text search input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Construction parameters for a [`SearchSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub initial_filters: FilterParams,
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_filters: FilterParams::first_page(DEFAULT_PAGE_SIZE),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl SessionConfig {
    pub fn page_size(mut self, limit: u32) -> Self {
        self.initial_filters.limit = Some(limit);
        self
    }

    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    /// Starts the session from these filters; their search text counts as
    /// already settled.
    pub fn filters(mut self, filters: FilterParams) -> Self {
        self.initial_filters = filters;
        self
    }
}

/// Observable state of a search session.
///
/// `results` and `error` are independent: a failed query keeps the previous
/// results next to the new error message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub filters: FilterParams,
    pub debounced_search: Option<String>,
    pub results: Option<FilteredResults>,
    pub loading: bool,
    pub error: Option<String>,
    pub export_loading: bool,
    pub search_view_active: bool,
    pub has_active_filters: bool,
    pub queries_issued: u64,
}

/// Search/filter/pagination/export orchestration for one dashboard view.
///
/// Every change of the tracked dependencies (debounced search text, dates,
/// company and event type selections, limit, offset) issues a new query
/// while the search view is active. Responses are tagged with a generation
/// and only the newest issued query may update the state; superseded
/// requests are aborted.
///
/// Dropping the session cancels the debounce timer and any query in flight.
pub struct SearchSession {
    inner: Arc<SessionInner>,
    search_text: Debouncer<Option<String>>,
    listener: JoinHandle<()>,
}

struct SessionInner {
    backend: Arc<dyn QueryBackend>,
    state: Mutex<SessionState>,
    snapshot: watch::Sender<SearchSnapshot>,
}

struct SessionState {
    filters: FilterState,
    debounced_text: Option<String>,
    active: bool,
    last_issued: Option<FilterParams>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    results: Option<FilteredResults>,
    loading: bool,
    error: Option<String>,
    export_loading: bool,
}

impl SessionState {
    fn effective_filters(&self) -> FilterParams {
        effective_filters(self.filters.params(), self.debounced_text.as_deref())
    }

    fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            filters: self.filters.params().clone(),
            debounced_search: self.debounced_text.clone(),
            results: self.results.clone(),
            loading: self.loading,
            error: self.error.clone(),
            export_loading: self.export_loading,
            search_view_active: self.active,
            has_active_filters: self.filters.has_active_filters(),
            queries_issued: self.generation,
        }
    }
}

impl SearchSession {
    /// Creates the session. Must be called within a Tokio runtime.
    pub fn new(backend: Arc<dyn QueryBackend>, config: SessionConfig) -> Self {
        let SessionConfig {
            initial_filters,
            debounce,
        } = config;

        let debounced_text = initial_filters.search_text.clone();
        let state = SessionState {
            filters: FilterState::new(initial_filters),
            debounced_text: debounced_text.clone(),
            active: false,
            last_issued: None,
            generation: 0,
            in_flight: None,
            results: None,
            loading: false,
            error: None,
            export_loading: false,
        };
        let (snapshot, _) = watch::channel(state.snapshot());
        let inner = Arc::new(SessionInner {
            backend,
            state: Mutex::new(state),
            snapshot,
        });

        let search_text = Debouncer::new(debounced_text, debounce);
        let listener = tokio::spawn(follow_debounced_text(
            Arc::downgrade(&inner),
            search_text.subscribe(),
        ));

        Self {
            inner,
            search_text,
            listener,
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Resolves once no search is in flight.
    pub async fn wait_idle(&self) -> SearchSnapshot {
        let mut receiver = self.subscribe();
        let idle = receiver
            .wait_for(|snapshot| !snapshot.loading)
            .await
            .map(|snapshot| snapshot.clone());
        match idle {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }

    /// Shows the search view; always issues a query.
    pub fn enter_search_view(&self) {
        {
            let mut state = self.inner.state.lock();
            state.active = true;
            state.last_issued = None;
        }
        self.inner.sync();
    }

    /// Hides the search view. Filter edits no longer issue queries.
    pub fn leave_search_view(&self) {
        let mut state = self.inner.state.lock();
        state.active = false;
        self.inner.publish(&state);
    }

    /// Merges `patch` into the filters and resets the offset.
    pub fn set_filters(&self, patch: FilterPatch) {
        self.edit(|filters| filters.set_filters(patch));
    }

    /// Removes every filter, keeping the page size.
    pub fn clear_filters(&self) {
        self.edit(FilterState::clear);
    }

    /// Requests the next page.
    pub fn load_more(&self) {
        self.edit(FilterState::load_more);
    }

    /// Free-text input. Queries see it only after the debounce delay.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        let text = if text.is_empty() { None } else { Some(text) };
        self.edit(|filters| filters.set_search_text(text));
    }

    pub fn toggle_company(&self, company_id: &str, selected: bool) {
        self.edit(|filters| filters.toggle_company(company_id, selected));
    }

    pub fn toggle_event_type(&self, event_type: &str, selected: bool) {
        self.edit(|filters| filters.toggle_event_type(event_type, selected));
    }

    /// Re-issues the current query, e.g. after a failure.
    pub fn refresh(&self) {
        {
            let mut state = self.inner.state.lock();
            state.last_issued = None;
        }
        self.inner.sync();
    }

    /// Downloads the current filter set in `format`.
    ///
    /// Uses its own `export_loading` flag; a failure is reported through the
    /// shared error field and leaves search results alone.
    pub async fn export(&self, format: ExportFormat) -> Result<ExportFile, ApiError> {
        let request = {
            let mut state = self.inner.state.lock();
            state.export_loading = true;
            self.inner.publish(&state);
            ExportRequest {
                format,
                filters: state.effective_filters(),
            }
        };

        info!(%format, "exporting filtered events");
        let outcome = self.inner.backend.export(&request).await;

        {
            let mut state = self.inner.state.lock();
            state.export_loading = false;
            if let Err(err) = &outcome {
                warn!(error = %err, "export failed");
                state.error = Some(err.to_string());
            }
            self.inner.publish(&state);
        }

        outcome
    }

    fn edit(&self, edit: impl FnOnce(&mut FilterState)) {
        let raw_text_changed = {
            let mut state = self.inner.state.lock();
            let before = state.filters.params().search_text.clone();
            edit(&mut state.filters);
            let after = state.filters.params().search_text.clone();
            (before != after).then_some(after)
        };

        if let Some(text) = raw_text_changed {
            self.search_text.push(text);
        }
        self.inner.sync();
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.listener.abort();
        if let Some(in_flight) = self.inner.state.lock().in_flight.take() {
            in_flight.abort();
        }
    }
}

impl SessionInner {
    /// Issues a query when the tracked dependencies differ from the last
    /// issued ones, then publishes the state.
    fn sync(self: &Arc<Self>) {
        let mut state = self.state.lock();
        if state.active {
            let effective = state.effective_filters();
            if state.last_issued.as_ref() != Some(&effective) {
                self.issue(&mut state, effective);
            }
        }
        self.publish(&state);
    }

    fn issue(self: &Arc<Self>, state: &mut SessionState, filters: FilterParams) {
        state.generation += 1;
        let generation = state.generation;
        state.last_issued = Some(filters.clone());
        state.loading = true;
        state.error = None;

        if let Some(previous) = state.in_flight.take() {
            debug!(generation, "aborting superseded search");
            previous.abort();
        }

        debug!(generation, ?filters, "issuing search");
        let inner = Arc::clone(self);
        state.in_flight = Some(tokio::spawn(async move {
            let outcome = inner.backend.search(&filters).await;
            inner.complete(generation, outcome);
        }));
    }

    fn complete(&self, generation: u64, outcome: Result<FilteredResults, ApiError>) {
        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(
                generation,
                current = state.generation,
                "discarding stale search response"
            );
            return;
        }

        state.in_flight = None;
        state.loading = false;
        match outcome {
            Ok(results) => {
                debug!(
                    generation,
                    page = results.events.len(),
                    filtered = results.filtered_count,
                    "search completed"
                );
                state.results = Some(results);
            }
            Err(err) => {
                warn!(generation, error = %err, "search failed");
                state.error = Some(err.to_string());
            }
        }
        self.publish(&state);
    }

    fn publish(&self, state: &SessionState) {
        let next = state.snapshot();
        self.snapshot.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

async fn follow_debounced_text(
    inner: Weak<SessionInner>,
    mut settled: watch::Receiver<Option<String>>,
) {
    while settled.changed().await.is_ok() {
        let text = settled.borrow_and_update().clone();
        let Some(inner) = inner.upgrade() else {
            break;
        };
        {
            let mut state = inner.state.lock();
            state.debounced_text = text;
        }
        inner.sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_for, FakeBackend};
    use std::sync::atomic::Ordering;
    use tokio::time::sleep;

    fn session_over(backend: &Arc<FakeBackend>) -> SearchSession {
        let backend: Arc<dyn QueryBackend> = backend.clone();
        SearchSession::new(backend, SessionConfig::default())
    }

    async fn active_session(backend: &Arc<FakeBackend>) -> (SearchSession, SearchSnapshot) {
        let session = session_over(backend);
        session.enter_search_view();
        let idle = session.wait_idle().await;
        (session, idle)
    }

    #[tokio::test(start_paused = true)]
    async fn entering_search_view_issues_first_page() {
        let backend = Arc::new(FakeBackend::new());
        let (_session, idle) = active_session(&backend).await;

        assert_eq!(backend.last_search(), Some(FilterParams::first_page(50)));
        assert_eq!(idle.queries_issued, 1);
        assert!(!idle.loading);
        assert_eq!(idle.error, None);
        assert_eq!(idle.results, Some(page_for(&FilterParams::first_page(50))));
    }

    #[tokio::test(start_paused = true)]
    async fn inactive_view_issues_nothing() {
        let backend = Arc::new(FakeBackend::new());
        let session = session_over(&backend);

        session.set_filters(FilterPatch::new().company_ids(["acme"]));
        session.set_search_text("login");
        sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.search_count(), 0);
        assert_eq!(session.snapshot().debounced_search.as_deref(), Some("login"));

        session.enter_search_view();
        session.wait_idle().await;
        let issued = backend.last_search().expect("one search");
        assert_eq!(backend.search_count(), 1);
        assert_eq!(issued.company_ids, Some(vec!["acme".to_string()]));
        assert_eq!(issued.search_text.as_deref(), Some("login"));
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_search_view_stops_queries() {
        let backend = Arc::new(FakeBackend::new());
        let (session, _) = active_session(&backend).await;

        session.leave_search_view();
        session.toggle_event_type("Metric", true);
        sleep(Duration::from_secs(1)).await;

        assert_eq!(backend.search_count(), 1);
        assert!(!session.snapshot().search_view_active);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_issues_one_query_after_debounce() {
        let backend = Arc::new(FakeBackend::new());
        let (session, _) = active_session(&backend).await;

        for text in ["l", "lo", "log", "logi", "login"] {
            session.set_search_text(text);
            sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(backend.search_count(), 1, "raw text must not query");
        assert_eq!(
            session.snapshot().filters.search_text.as_deref(),
            Some("login")
        );

        sleep(Duration::from_millis(300)).await;
        let idle = session.wait_idle().await;

        assert_eq!(backend.search_count(), 2);
        let issued = backend.last_search().expect("debounced search");
        assert_eq!(issued.search_text.as_deref(), Some("login"));
        assert_eq!(idle.debounced_search.as_deref(), Some("login"));
    }

    #[tokio::test(start_paused = true)]
    async fn filter_edit_after_paging_requests_first_page() {
        let backend = Arc::new(FakeBackend::new());
        let (session, _) = active_session(&backend).await;

        session.load_more();
        session.wait_idle().await;
        assert_eq!(backend.last_search().and_then(|f| f.offset), Some(50));

        session.toggle_company("globex", true);
        let idle = session.wait_idle().await;
        let issued = backend.last_search().expect("search");
        assert_eq!(issued.offset, Some(0));
        assert_eq!(issued.company_ids, Some(vec!["globex".to_string()]));
        assert!(idle.has_active_filters);
    }

    #[tokio::test(start_paused = true)]
    async fn latest_issued_query_wins() {
        let backend = Arc::new(FakeBackend::new().with_latencies([
            Duration::from_millis(10),
            Duration::from_millis(500),
            Duration::from_millis(50),
        ]));
        let (session, _) = active_session(&backend).await;

        session.set_filters(FilterPatch::new().company_ids(["initech"]));
        sleep(Duration::from_millis(5)).await;
        session.set_filters(FilterPatch::new().company_ids(["globex"]));

        let idle = session.wait_idle().await;
        let results = idle.results.expect("results");
        assert_eq!(results.events[0].company_id, "globex");

        sleep(Duration::from_secs(1)).await;
        let settled = session.snapshot();
        assert_eq!(settled.queries_issued, 3);
        assert_eq!(
            settled.results.expect("results").events[0].company_id,
            "globex"
        );
        assert_eq!(backend.completed_searches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_query_keeps_previous_results() {
        let backend = Arc::new(FakeBackend::new());
        let (session, first) = active_session(&backend).await;

        backend.fail_searches(true);
        session.load_more();
        let failed = session.wait_idle().await;

        assert_eq!(failed.error.as_deref(), Some("request failed: connection refused"));
        assert_eq!(failed.results, first.results);
        assert_eq!(failed.filters.offset, Some(50));

        backend.fail_searches(false);
        session.refresh();
        let recovered = session.wait_idle().await;
        assert_eq!(recovered.error, None);
        assert_eq!(backend.last_search().and_then(|f| f.offset), Some(50));
    }

    #[tokio::test(start_paused = true)]
    async fn export_uses_settled_search_text() {
        let backend = Arc::new(FakeBackend::new());
        let (session, _) = active_session(&backend).await;

        session.set_search_text("login");
        sleep(Duration::from_millis(400)).await;
        session.set_search_text("logout");

        let file = session.export(ExportFormat::Csv).await.expect("export");
        assert_eq!(file.filename, "export.csv");

        let exports = backend.exports.lock();
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].format, ExportFormat::Csv);
        assert_eq!(exports[0].filters.search_text.as_deref(), Some("login"));
    }

    #[tokio::test(start_paused = true)]
    async fn export_has_its_own_loading_flag() {
        let backend = Arc::new(FakeBackend::new());
        let (session, _) = active_session(&backend).await;
        let mut updates = session.subscribe();

        let (exported, observed) = tokio::join!(session.export(ExportFormat::Json), async {
            updates
                .wait_for(|snapshot| snapshot.export_loading)
                .await
                .map(|snapshot| snapshot.loading)
        });

        exported.expect("export");
        assert!(!observed.expect("session alive"), "search stays idle");
        assert!(!session.snapshot().export_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn export_failure_leaves_search_state_alone() {
        let backend = Arc::new(FakeBackend::new());
        let (session, before) = active_session(&backend).await;

        backend.fail_exports(true);
        let err = session
            .export(ExportFormat::Csv)
            .await
            .expect_err("export must fail");
        let after = session.snapshot();

        assert_eq!(after.error, Some(err.to_string()));
        assert_eq!(after.results, before.results);
        assert!(!after.loading);
        assert!(!after.export_loading);
        assert_eq!(after.queries_issued, before.queries_issued);
        assert_eq!(backend.search_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_session_abandons_in_flight_query() {
        let backend = Arc::new(FakeBackend::new().with_latencies([Duration::from_secs(1)]));
        let session = session_over(&backend);
        session.enter_search_view();
        sleep(Duration::from_millis(10)).await;
        assert!(session.snapshot().loading);

        drop(session);
        sleep(Duration::from_secs(2)).await;

        assert_eq!(backend.search_count(), 1);
        assert_eq!(backend.completed_searches.load(Ordering::SeqCst), 0);
    }
}
