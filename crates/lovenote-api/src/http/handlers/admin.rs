//! Admin moderation handlers. Mounted only when `admin.enabled` is set.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use lovenote_types::confession::{Confession, ConfessionId, ConfessionStatistics, ConfessionStatus};

use crate::http::error::AppError;
use crate::http::extractors::auth::AdminAuth;
use crate::http::extractors::query::AdminListQuery;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

/// GET /api/v1/admin/confessions - Every confession, contact details included.
pub async fn list_confessions(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<ApiResponse<Vec<Confession>>>, AppError> {
    let timer = RequestTimer::start();

    let status = query
        .status
        .as_deref()
        .map(str::parse::<ConfessionStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    let confessions = state.confession_service.admin_list(status).await?;
    Ok(Json(timer.success(confessions).with_link("stats", "/api/v1/admin/stats")))
}

/// PUT /api/v1/admin/confessions/{id}/status - Approve, reject or hold.
pub async fn update_status(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<ApiResponse<Confession>>, AppError> {
    let timer = RequestTimer::start();

    let id: ConfessionId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid confession id: '{id}'")))?;
    let status = body
        .status
        .parse::<ConfessionStatus>()
        .map_err(AppError::Validation)?;

    let confession = state.confession_service.moderate(&id, status).await?;
    Ok(Json(timer.success(confession)))
}

/// GET /api/v1/admin/stats - Dashboard numbers.
pub async fn get_stats(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<ApiResponse<ConfessionStatistics>>, AppError> {
    let timer = RequestTimer::start();
    let stats = state.confession_service.statistics().await?;
    Ok(Json(timer.success(stats)))
}
