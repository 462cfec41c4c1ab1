mod envelope;
mod event;
mod export;
mod filter;
mod nullable;
mod results;
mod summary;

pub use envelope::ApiEnvelope;
pub use event::UsageEvent;
pub use export::{ExportFile, ExportFormat, ExportRequest};
pub use filter::{FilterParams, FilterPatch, DEFAULT_PAGE_SIZE};
pub use results::{ConsistencyError, FilteredResults};
pub use summary::{
    AvailableFilters, CompanyAnalytics, DashboardSummary, DateRange, TimeRange, TimeSeriesPoint,
};
