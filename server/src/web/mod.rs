// File: server/src/web/mod.rs
pub mod handlers;
pub mod server;

pub use server::start_web_server;

use std::sync::Arc;

use crate::alerts::AlertDispatcher;
use crate::config::Config;
use crate::identity::IdentityProvider;
use crate::services::{MonitorService, PingService};
use crate::sweep::SweepScheduler;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub monitor_service: Arc<MonitorService>,
    pub ping_service: Arc<PingService>,
    pub sweep_scheduler: Arc<SweepScheduler>,
    pub dispatcher: Arc<AlertDispatcher>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        monitor_service: Arc<MonitorService>,
        ping_service: Arc<PingService>,
        sweep_scheduler: Arc<SweepScheduler>,
        dispatcher: Arc<AlertDispatcher>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config,
            monitor_service,
            ping_service,
            sweep_scheduler,
            dispatcher,
            identity,
        }
    }
}
