// File: server/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use server::alerts::{AlertDispatcher, ResendMailer};
use server::config::ConfigManager;
use server::database::Database;
use server::identity::{ConfigIdentityProvider, IdentityProvider};
use server::services::{MonitorService, PingService};
use server::sweep::SweepScheduler;
use server::web::{start_web_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity for dependencies
    let env_filter = EnvFilter::from_default_env()
        .add_directive("server=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting heartbeat monitoring service");

    // Load configuration
    let config_manager = ConfigManager::new("config".to_string()).await?;
    let config = config_manager.get_current_config();
    info!(
        "Configuration loaded: {} users in directory, quota {} monitors/user",
        config.users.len(),
        config.max_monitors_per_user
    );

    // Initialize database
    let database = Arc::new(Database::new(&config.database_path).await?);

    // Owner identity directory (stand-in for the external auth provider)
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(ConfigIdentityProvider::new(config.users.clone()));

    // Email channel is optional; without an API key only webhooks fire
    let mailer = config
        .resend_api_key
        .clone()
        .map(|key| ResendMailer::new(key, config.alert_from_address.clone()));

    let dispatcher = Arc::new(AlertDispatcher::new(
        database.clone(),
        mailer,
        config.app_url.clone(),
    ));
    if dispatcher.email_channel_enabled() {
        info!("Email alert channel enabled");
    } else {
        warn!("Email alert channel disabled: no RESEND_API_KEY configured");
        warn!("Monitors with alert_email=true will only alert via webhook");
    }

    // Core services: ping ingest (happy path) and sweep (unhappy path)
    let ping_service = Arc::new(PingService::new(
        database.clone(),
        dispatcher.clone(),
        identity.clone(),
    ));
    let monitor_service = Arc::new(MonitorService::new(database.clone(), config.clone()));
    let sweep_scheduler = Arc::new(SweepScheduler::new(
        database.clone(),
        dispatcher.clone(),
        identity.clone(),
        config.max_concurrent_checks,
    ));

    // Built-in sweep ticker. The authenticated HTTP trigger drives the same
    // path, and both may fire concurrently: per-monitor transitions are
    // idempotent and the alert claim is conditional.
    if config.sweep_interval_seconds > 0 {
        let scheduler = sweep_scheduler.clone();
        let tick_seconds = config.sweep_interval_seconds;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(tick_seconds));
            loop {
                interval.tick().await;
                if let Err(e) = scheduler.run_sweep().await {
                    warn!("Sweep tick failed: {}", e);
                }
            }
        });
        info!("Built-in sweep ticker started ({}s cadence)", tick_seconds);
    } else {
        info!("Built-in sweep ticker disabled; expecting external cron trigger");
    }

    // Start web server
    let state = AppState::new(
        config,
        monitor_service,
        ping_service,
        sweep_scheduler,
        dispatcher,
        identity,
    );
    start_web_server(state).await?;

    Ok(())
}
