// Webhook configuration test endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::alerts::webhook::TestSendError;
use crate::ssrf;
use crate::web::AppState;

#[derive(Deserialize)]
pub struct WebhookTestRequest {
    pub webhook_url: String,
}

/// `POST /api/webhooks/test` - verifies a webhook URL by delivering a
/// test notification. The URL passes the same SSRF guard as monitor
/// creation before anything is sent.
pub async fn test_webhook(
    State(state): State<AppState>,
    Json(request): Json<WebhookTestRequest>,
) -> Response {
    if request.webhook_url.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "webhook_url is required" })),
        )
            .into_response();
    }

    if let Err(e) = ssrf::validate_webhook_url(&request.webhook_url).await {
        return (e.status_code(), Json(json!({ "error": e.to_string() }))).into_response();
    }

    match state.dispatcher.send_test_webhook(&request.webhook_url).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(TestSendError::Delivery { status, body }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "status": status, "error": body })),
        )
            .into_response(),
        Err(TestSendError::Transport(msg)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "error": msg })),
        )
            .into_response(),
    }
}
