// Ping ingest endpoint (the public, slug-addressed liveness signal)

use axum::extract::{ConnectInfo, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::net::SocketAddr;
use tracing::error;

use super::common::source_ip;
use crate::errors::ServiceError;
use crate::web::AppState;

/// `GET /api/ping/{slug}` - records a liveness ping.
///
/// Mutates state but is safe to retry; every retry just pushes the
/// deadline further out. axum routes HEAD here too, which gives clients
/// that cannot parse a body the lightweight variant for free.
pub async fn record_ping(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let ip = source_ip(&headers, Some(peer));
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    match state.ping_service.record_ping(&slug, &ip, user_agent).await {
        Ok(recorded) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-store")],
            Json(json!({
                "ok": true,
                "monitor_id": recorded.slug,
                "pinged_at": recorded.pinged_at.to_rfc3339(),
                "next_expected_at": recorded.next_expected_at.to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e) => {
            if matches!(e, ServiceError::Storage(_)) {
                error!("Ping ingest failed for slug {}: {}", slug, e);
            }
            (e.status_code(), Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}
