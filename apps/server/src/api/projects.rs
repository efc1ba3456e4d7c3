use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sitefolio_core::{
    evm::{EvmSnapshot, ProjectSeries, TrendAnalysis},
    projects::ProjectBudget,
};
use tokio::task;

use super::shared::{ensure_bucket_limit, parse_bucket, parse_date_optional, parse_range};

async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ProjectBudget>>> {
    let projects = state.portfolio_service.list_projects()?;
    Ok(Json(projects))
}

#[derive(serde::Deserialize)]
struct SnapshotQuery {
    /// Optional date in ISO format (YYYY-MM-DD). Defaults to today.
    #[serde(rename = "asOf")]
    as_of: Option<String>,
}

async fn get_snapshot(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<SnapshotQuery>,
) -> ApiResult<Json<EvmSnapshot>> {
    let as_of = parse_date_optional(q.as_of, "asOf")?.unwrap_or_else(|| Utc::now().date_naive());
    let snapshot =
        task::spawn_blocking(move || state.evm_service.get_snapshot(&id, as_of)).await??;
    Ok(Json(snapshot))
}

#[derive(serde::Deserialize)]
struct SeriesQuery {
    #[serde(rename = "startDate")]
    start_date: String,
    #[serde(rename = "endDate")]
    end_date: String,
    /// day, week or month. Defaults to the configured bucket.
    bucket: Option<String>,
}

async fn get_series(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<SeriesQuery>,
) -> ApiResult<Json<ProjectSeries>> {
    let range = parse_range(&q.start_date, &q.end_date)?;
    let bucket = parse_bucket(q.bucket.as_deref(), state.settings.default_bucket)?;
    ensure_bucket_limit(range, bucket, state.max_series_points)?;
    let series =
        task::spawn_blocking(move || state.evm_service.get_series(&id, range, bucket)).await??;
    Ok(Json(series))
}

async fn get_trend(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<SeriesQuery>,
) -> ApiResult<Json<TrendAnalysis>> {
    let range = parse_range(&q.start_date, &q.end_date)?;
    let bucket = parse_bucket(q.bucket.as_deref(), state.settings.default_bucket)?;
    ensure_bucket_limit(range, bucket, state.max_series_points)?;
    let trend =
        task::spawn_blocking(move || state.evm_service.get_trend(&id, range, bucket)).await??;
    Ok(Json(trend))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", get(list_projects))
        .route("/projects/{id}/snapshot", get(get_snapshot))
        .route("/projects/{id}/series", get(get_series))
        .route("/projects/{id}/trend", get(get_trend))
}
