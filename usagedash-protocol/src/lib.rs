pub mod analytics;

pub mod prelude {
    pub use crate::analytics::{
        ApiEnvelope, AvailableFilters, CompanyAnalytics, DashboardSummary, DateRange,
        ExportFile, ExportFormat, ExportRequest, FilterParams, FilterPatch, FilteredResults,
        TimeRange, TimeSeriesPoint, UsageEvent, DEFAULT_PAGE_SIZE,
    };
}
