// Overview loading through the HTTP client.
use serde_json::json;
use usagedash::{load_overview, ApiClient, OverviewState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn overview_derives_filter_options_from_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "success",
            "data": {
                "total_events": 157,
                "unique_companies": 2,
                "event_types": {"Action": 89, "Metric": 68},
                "recent_events": [{
                    "id": "evt-1",
                    "created_at": "2025-05-20T09:15:00Z",
                    "company_id": "acme",
                    "type": "Action",
                    "content": "User login - Acme"
                }],
                "time_range": {"start": "2025-05-01T00:00:00Z", "end": "2025-05-31T00:00:00Z"},
                "top_companies": [
                    {"company_id": "acme", "event_count": 120},
                    {"company_id": "globex", "event_count": 37}
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let state = load_overview(&client).await;
    let overview = state.overview().expect("overview ready");

    assert_eq!(overview.available_filters.companies, vec!["acme", "globex"]);
    assert_eq!(overview.available_filters.event_types, vec!["Action", "Metric"]);
    assert_eq!(overview.top_event_type(), Some(("Action", 89)));
}

#[tokio::test]
async fn summary_failure_fails_the_whole_overview() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/summary"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let state = load_overview(&client).await;
    assert_eq!(state, OverviewState::Failed("API Error: 503".to_string()));
}

#[tokio::test]
async fn null_company_list_is_an_empty_section() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "success",
            "data": {
                "total_events": 3,
                "unique_companies": 0,
                "event_types": {"Action": 3},
                "recent_events": [],
                "time_series_data": null,
                "top_companies": null
            }
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let state = load_overview(&client).await;
    let overview = state.overview().expect("overview ready");

    assert!(overview.summary.top_companies.is_empty());
    assert!(overview.summary.time_series_data.is_empty());
    assert!(overview.available_filters.companies.is_empty());
    assert_eq!(overview.top_event_type(), Some(("Action", 3)));
}
