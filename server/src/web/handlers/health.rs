// Service liveness endpoint

use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

/// `GET /api/health` - unauthenticated liveness probe
pub async fn health() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({
            "status": "ok",
            "service": "monitoring",
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}
