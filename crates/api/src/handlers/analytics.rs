//! Handlers for the `/analytics` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use marro_core::lifecycle::MetricPeriod;
use marro_db::models::analytics::{AnalyticsEntry, CreateAnalyticsEntry};
use marro_db::repositories::AnalyticsRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PeriodFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/analytics
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAnalyticsEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<AnalyticsEntry>>)> {
    input.validate()?;
    let period = input.period.parse::<MetricPeriod>()?;

    let entry = AnalyticsRepo::create(&state.pool, auth.owner_id, &input, period.as_str()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/analytics[?period=]
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PeriodFilterParams>,
) -> AppResult<Json<DataResponse<Vec<AnalyticsEntry>>>> {
    let period = params
        .period
        .as_deref()
        .map(str::parse::<MetricPeriod>)
        .transpose()?;

    let entries =
        AnalyticsRepo::list(&state.pool, auth.owner_id, period.map(MetricPeriod::as_str)).await?;
    Ok(Json(DataResponse { data: entries }))
}
