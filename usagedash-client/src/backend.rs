use async_trait::async_trait;
use usagedash_protocol::prelude::{
    DashboardSummary, ExportFile, ExportRequest, FilterParams, FilteredResults,
};

use crate::client::ApiClient;
use crate::error::ApiError;

/// The query backend as seen by the dashboard: summary, search and export.
#[async_trait]
pub trait QueryBackend: Send + Sync + 'static {
    async fn summary(&self) -> Result<DashboardSummary, ApiError>;

    async fn search(&self, filters: &FilterParams) -> Result<FilteredResults, ApiError>;

    async fn export(&self, request: &ExportRequest) -> Result<ExportFile, ApiError>;
}

#[async_trait]
impl QueryBackend for ApiClient {
    async fn summary(&self) -> Result<DashboardSummary, ApiError> {
        ApiClient::summary(self).await
    }

    async fn search(&self, filters: &FilterParams) -> Result<FilteredResults, ApiError> {
        ApiClient::search(self, filters).await
    }

    async fn export(&self, request: &ExportRequest) -> Result<ExportFile, ApiError> {
        ApiClient::export(self, request).await
    }
}
