use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use sitefolio_core::{
    evm::ProjectStatus,
    portfolio::{PortfolioSeries, PortfolioSummary, ProjectFilter},
};
use tokio::task;

use super::shared::{ensure_bucket_limit, parse_bucket, parse_date_optional, parse_range};

/// Selected projects; omitted means every known project.
fn resolve_project_ids(state: &AppState, project_ids: Option<Vec<String>>) -> ApiResult<Vec<String>> {
    match project_ids {
        Some(ids) => Ok(ids),
        None => Ok(state
            .portfolio_service
            .list_projects()?
            .into_iter()
            .map(|p| p.project_id)
            .collect()),
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequestBody {
    pub project_ids: Option<Vec<String>>,
    pub start_date: String,
    pub end_date: String,
    pub bucket: Option<String>,
}

async fn aggregate_portfolio(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AggregateRequestBody>,
) -> ApiResult<Json<PortfolioSeries>> {
    let range = parse_range(&body.start_date, &body.end_date)?;
    let bucket = parse_bucket(body.bucket.as_deref(), state.settings.default_bucket)?;
    ensure_bucket_limit(range, bucket, state.max_series_points)?;
    let project_ids = resolve_project_ids(&state, body.project_ids)?;
    let series = task::spawn_blocking(move || {
        state
            .portfolio_service
            .aggregate(&project_ids, range, bucket)
    })
    .await??;
    Ok(Json(series))
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequestBody {
    pub project_ids: Option<Vec<String>>,
    /// ISO date; defaults to today.
    pub as_of: Option<String>,
    pub status: Option<String>,
    pub min_cpi: Option<Decimal>,
    pub min_spi: Option<Decimal>,
}

impl SummaryRequestBody {
    pub fn filter(&self) -> ApiResult<ProjectFilter> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ProjectStatus>)
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(ProjectFilter {
            status,
            min_cpi: self.min_cpi,
            min_spi: self.min_spi,
        })
    }
}

async fn summarize_portfolio(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SummaryRequestBody>,
) -> ApiResult<Json<PortfolioSummary>> {
    let filter = body.filter()?;
    let as_of =
        parse_date_optional(body.as_of, "asOf")?.unwrap_or_else(|| Utc::now().date_naive());
    let project_ids = resolve_project_ids(&state, body.project_ids)?;
    let summary = task::spawn_blocking(move || {
        state
            .portfolio_service
            .summarize(&project_ids, as_of, &filter)
    })
    .await??;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio/aggregate", post(aggregate_portfolio))
        .route("/portfolio/summary", post(summarize_portfolio))
}
