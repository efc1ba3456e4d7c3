use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sitefolio_core::settings::EvmSettings;
use sitefolio_server::{api::app_router, build_state, config::Config};
use tempfile::tempdir;
use tower::ServiceExt;

fn record_set() -> Value {
    json!({
        "budgets": [
            {"projectId": "villa", "name": "Villa", "budgetAtCompletion": 1000, "plannedDurationDays": 90, "startDate": "2024-01-01"},
            {"projectId": "school", "budgetAtCompletion": 2000, "plannedDurationDays": 180}
        ],
        "costRecords": [
            {"projectId": "villa", "date": "2024-01-10", "plannedCost": 200, "actualCost": 150},
            {"projectId": "villa", "date": "2024-01-30", "plannedCost": 300, "actualCost": 300},
            {"projectId": "school", "date": "2024-01-15", "plannedCost": 500, "actualCost": 500}
        ],
        "progressRecords": [
            {"projectId": "villa", "date": "2024-01-30", "percentComplete": 40},
            {"projectId": "school", "date": "2024-01-20", "percentComplete": 20}
        ]
    })
}

async fn build_test_router() -> Router {
    let tmp = tempdir().unwrap();
    let data_file = tmp.path().join("records.json");
    std::fs::write(&data_file, record_set().to_string()).unwrap();

    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        data_file,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        max_series_points: 5_000,
        evm: EvmSettings::default(),
    };
    let state = build_state(&config).await.unwrap();
    app_router(state, &config)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn healthz_works() {
    let app = build_test_router().await;
    let response = app.oneshot(get("/api/v1/healthz")).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn lists_loaded_projects() {
    let app = build_test_router().await;
    let (status, body) = send(app, get("/api/v1/projects")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["projectId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["school", "villa"]);
}

#[tokio::test]
async fn snapshot_reports_evm_metrics() {
    let app = build_test_router().await;
    let (status, body) = send(app, get("/api/v1/projects/villa/snapshot?asOf=2024-01-30")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plannedValue"].as_f64(), Some(500.0));
    assert_eq!(body["earnedValue"].as_f64(), Some(400.0));
    assert_eq!(body["actualCost"].as_f64(), Some(450.0));
    assert_eq!(body["costVariance"].as_f64(), Some(-50.0));
    assert_eq!(body["schedulePerformanceIndex"]["state"], "measurable");
    assert_eq!(body["status"], "behind");
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let app = build_test_router().await;
    let (status, body) = send(app, get("/api/v1/projects/ghost/snapshot?asOf=2024-01-30")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn inverted_range_is_bad_request() {
    let app = build_test_router().await;
    let (status, _) = send(
        app,
        get("/api/v1/projects/villa/series?startDate=2024-03-01&endDate=2024-01-01"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_day_range_is_bad_request() {
    let app = build_test_router().await;
    let (status, body) = send(
        app.clone(),
        get("/api/v1/projects/villa/series?startDate=0001-01-01&endDate=9999-12-31&bucket=day"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("limit of 5000"));

    let (status, _) = send(
        app,
        post(
            "/api/v1/portfolio/aggregate",
            json!({"startDate": "2000-01-01", "endDate": "2030-12-31", "bucket": "day"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn snapshot_with_unrepresentable_totals_is_bad_request() {
    let tmp = tempdir().unwrap();
    let data_file = tmp.path().join("records.json");
    let huge = "50000000000000000000000000000";
    let raw = format!(
        r#"{{
            "budgets": [{{"projectId": "dam", "budgetAtCompletion": 1000, "plannedDurationDays": 30}}],
            "costRecords": [
                {{"projectId": "dam", "date": "2024-01-02", "plannedCost": 10, "actualCost": {huge}}},
                {{"projectId": "dam", "date": "2024-01-03", "plannedCost": 10, "actualCost": {huge}}}
            ]
        }}"#
    );
    std::fs::write(&data_file, raw).unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        data_file,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(5),
        max_series_points: 5_000,
        evm: EvmSettings::default(),
    };
    let app = app_router(build_state(&config).await.unwrap(), &config);

    let (status, body) = send(app, get("/api/v1/projects/dam/snapshot?asOf=2024-01-10")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("overflow"));
}

#[tokio::test]
async fn monthly_series_and_trend() {
    let app = build_test_router().await;
    let (status, body) = send(
        app.clone(),
        get("/api/v1/projects/villa/series?startDate=2024-01-01&endDate=2024-03-31&bucket=month"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body["snapshots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["asOfDate"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);

    let (status, body) = send(
        app,
        get("/api/v1/projects/villa/trend?startDate=2024-01-01&endDate=2024-03-31"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataPoints"], 3);
    assert_eq!(body["cpiTrend"], "stable");
}

#[tokio::test]
async fn portfolio_aggregate_excludes_unknown_projects() {
    let app = build_test_router().await;
    let (status, body) = send(
        app,
        post(
            "/api/v1/portfolio/aggregate",
            json!({
                "projectIds": ["villa", "school", "ghost"],
                "startDate": "2024-02-01",
                "endDate": "2024-02-01",
                "bucket": "day"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["excludedProjects"][0]["projectId"], "ghost");
    let point = &body["points"][0];
    assert_eq!(point["totalEarnedValue"].as_f64(), Some(800.0));
    assert_eq!(point["totalActualCost"].as_f64(), Some(950.0));
    assert_eq!(point["contributingProjects"], 2);
}

#[tokio::test]
async fn portfolio_summary_filters_by_status() {
    let app = build_test_router().await;
    let (status, body) = send(
        app,
        post(
            "/api/v1/portfolio/summary",
            json!({"asOf": "2024-02-01", "status": "behind"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCounts"]["behind"], 2);
    assert_eq!(body["projects"].as_array().unwrap().len(), 2);
    assert_eq!(body["totals"]["contributingProjects"], 2);
}
