// Monitor CRUD endpoints

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use tracing::error;

use super::common::{require_user, service_error, ApiResponse, ApiResult};
use crate::database::{MonitorRecord, MonitorUpdate};
use crate::errors::ServiceError;
use crate::services::CreateMonitorInput;
use crate::web::AppState;

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, ServiceError> {
    let user_id = require_user(headers)?;
    if !state.identity.is_known_user(&user_id) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(user_id)
}

/// List the caller's monitors, newest first
pub async fn list_monitors(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<MonitorRecord>> {
    let user_id = authorize(&state, &headers).map_err(service_error)?;
    match state.monitor_service.list_monitors(&user_id).await {
        Ok(monitors) => Ok(Json(ApiResponse::success(monitors))),
        Err(e) => {
            error!("Failed to list monitors for {}: {}", user_id, e);
            Err(service_error(e))
        }
    }
}

pub async fn create_monitor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateMonitorInput>,
) -> Result<(StatusCode, Json<ApiResponse<MonitorRecord>>), (StatusCode, Json<ApiResponse<()>>)> {
    let user_id = authorize(&state, &headers).map_err(service_error)?;
    match state.monitor_service.create_monitor(&user_id, input).await {
        Ok(monitor) => Ok((StatusCode::CREATED, Json(ApiResponse::success(monitor)))),
        Err(e) => Err(service_error(e)),
    }
}

pub async fn get_monitor(
    Path(monitor_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<MonitorRecord> {
    let user_id = authorize(&state, &headers).map_err(service_error)?;
    match state
        .monitor_service
        .get_monitor(&user_id, &monitor_id)
        .await
    {
        Ok(monitor) => Ok(Json(ApiResponse::success(monitor))),
        Err(e) => Err(service_error(e)),
    }
}

/// PATCH with a restricted field allowlist (name, pause flag, alert
/// settings). Unpausing resets status to `new` without clearing history.
pub async fn update_monitor(
    Path(monitor_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<MonitorUpdate>,
) -> ApiResult<MonitorRecord> {
    let user_id = authorize(&state, &headers).map_err(service_error)?;
    match state
        .monitor_service
        .update_monitor(&user_id, &monitor_id, update)
        .await
    {
        Ok(monitor) => Ok(Json(ApiResponse::success(monitor))),
        Err(e) => Err(service_error(e)),
    }
}

/// Delete cascades to the monitor's pings and alert logs
pub async fn delete_monitor(
    Path(monitor_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<()> {
    let user_id = authorize(&state, &headers).map_err(service_error)?;
    match state
        .monitor_service
        .delete_monitor(&user_id, &monitor_id)
        .await
    {
        Ok(()) => Ok(Json(ApiResponse::success(()))),
        Err(e) => Err(service_error(e)),
    }
}
