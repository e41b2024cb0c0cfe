// Sweep trigger endpoint (external cron invoker)

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use subtle::ConstantTimeEq;
use tracing::error;

use crate::web::AppState;

/// `GET /api/cron/check` - runs one sweep tick.
///
/// Requires the shared-secret bearer credential. Partial per-monitor
/// failures still return 200 with an `errors` array; only "the sweep
/// itself could not run" is a non-200.
pub async fn run_sweep(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .is_some_and(|token| {
            let secret = state.config.sweep_secret.as_bytes();
            // Constant-time compare; an unconfigured secret never authorizes
            !secret.is_empty() && bool::from(token.as_bytes().ct_eq(secret))
        });

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response();
    }

    match state.sweep_scheduler.run_sweep().await {
        Ok(summary) => {
            let mut body = json!({
                "ok": true,
                "checked": summary.checked,
                "alerted": summary.alerted,
                "recovered": summary.recovered,
                "timestamp": Utc::now().to_rfc3339(),
            });
            if !summary.errors.is_empty() {
                body["errors"] = json!(summary.errors);
            }
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!("Sweep failed to run: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
