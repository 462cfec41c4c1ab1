use std::time::Duration;

use reqwest::header::CONTENT_DISPOSITION;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use usagedash_protocol::prelude::{
    ApiEnvelope, DashboardSummary, ExportFile, ExportRequest, FilterParams, FilteredResults,
};

use crate::disposition::export_filename;
use crate::error::ApiError;
use crate::query::search_query;

const API_PREFIX: &str = "api/v1/";

/// Typed HTTP client for the analytics API.
///
/// Holds nothing but the base URL and a connection pool; construct one and
/// hand it to whatever owns the dashboard state.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a new client bound to the provided base URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http(base_url, reqwest::Client::new())
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_http(base_url, http)
    }

    fn with_http(base_url: &str, http: reqwest::Client) -> Result<Self, ApiError> {
        let mut url = Url::parse(base_url).map_err(|err| ApiError::InvalidUrl {
            url: base_url.to_string(),
            source: err,
        })?;

        if !url.path().ends_with('/') {
            let mut path = url.path().trim_end_matches('/').to_string();
            path.push('/');
            url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url: url,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /dashboard/summary`
    pub async fn summary(&self) -> Result<DashboardSummary, ApiError> {
        self.get("dashboard/summary", &[]).await
    }

    /// `GET /events/search` with the filters encoded as query parameters.
    pub async fn search(&self, filters: &FilterParams) -> Result<FilteredResults, ApiError> {
        self.get("events/search", &search_query(filters)).await
    }

    /// `POST /export`. The response is a raw file, not an envelope.
    pub async fn export(&self, request: &ExportRequest) -> Result<ExportFile, ApiError> {
        let url = self.endpoint("export")?;
        debug!(%url, format = %request.format, "requesting export");

        let response = self.http.post(url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status(),
            });
        }

        let header = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let filename = export_filename(header.as_deref(), request.format);
        let bytes = response.bytes().await?.to_vec();

        Ok(ExportFile { filename, bytes })
    }

    /// `GET /health`, returned as opaque JSON.
    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        self.get("health", &[]).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, params = query.len(), "GET");

        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status(),
            });
        }

        let body = response.bytes().await?;
        let envelope: ApiEnvelope<T> =
            serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))?;

        envelope
            .into_data()
            .ok_or_else(|| ApiError::Decode("response envelope carried no data".into()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let relative = format!("{API_PREFIX}{path}");
        self.base_url
            .join(&relative)
            .map_err(|err| ApiError::InvalidUrl {
                url: format!("{}{}", self.base_url, relative),
                source: err,
            })
    }
}
