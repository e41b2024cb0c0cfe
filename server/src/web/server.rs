// File: server/src/web/server.rs
use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server(state: AppState) -> Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === PING INGEST (public, slug-addressed) ===
        .route("/api/ping/{slug}", get(handlers::record_ping))
        // === SWEEP TRIGGER (shared-secret bearer auth) ===
        .route("/api/cron/check", get(handlers::run_sweep))
        // === MONITOR CRUD ===
        .route(
            "/api/monitors",
            get(handlers::list_monitors).post(handlers::create_monitor),
        )
        .route(
            "/api/monitors/{monitor_id}",
            get(handlers::get_monitor)
                .patch(handlers::update_monitor)
                .delete(handlers::delete_monitor),
        )
        // === WEBHOOK TEST ===
        .route("/api/webhooks/test", post(handlers::test_webhook))
        // === LIVENESS ===
        .route("/api/health", get(handlers::health))
        // Add middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
