//! Reusable test utilities:
//! - Mock webhook / mail servers (wiremock)
//! - Test configuration builder
//! - In-memory test database and a fully wired service stack
//! - Monitor record builder

// Allow unused code in test fixtures - they are utilities shared across suites
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_webhook;
pub mod test_config;
pub mod test_data;

pub use mock_webhook::MockWebhookServer;
pub use test_config::TestConfigBuilder;
pub use test_data::MonitorBuilder;

use std::collections::HashMap;
use std::sync::Arc;

use server::alerts::AlertDispatcher;
use server::config::Config;
use server::database::Database;
use server::identity::{ConfigIdentityProvider, IdentityProvider};
use server::services::{MonitorService, PingService};
use server::sweep::SweepScheduler;

pub const TEST_USER: &str = "u-1";
pub const TEST_USER_EMAIL: &str = "owner@example.com";

/// Fully wired service stack over an in-memory database.
pub struct TestStack {
    pub database: Arc<Database>,
    pub dispatcher: Arc<AlertDispatcher>,
    pub identity: Arc<dyn IdentityProvider>,
    pub scheduler: Arc<SweepScheduler>,
    pub ping_service: PingService,
    pub monitor_service: MonitorService,
}

impl TestStack {
    pub async fn new() -> Self {
        Self::with_config(TestConfigBuilder::new().build()).await
    }

    pub async fn with_config(config: Arc<Config>) -> Self {
        let database = Arc::new(
            Database::new_in_memory()
                .await
                .expect("in-memory database"),
        );

        let mut users = HashMap::new();
        users.insert(TEST_USER.to_string(), TEST_USER_EMAIL.to_string());
        let identity: Arc<dyn IdentityProvider> = Arc::new(ConfigIdentityProvider::new(users));

        let dispatcher = Arc::new(AlertDispatcher::new(
            database.clone(),
            None,
            config.app_url.clone(),
        ));

        let scheduler = Arc::new(SweepScheduler::new(
            database.clone(),
            dispatcher.clone(),
            identity.clone(),
            config.max_concurrent_checks,
        ));

        let ping_service = PingService::new(database.clone(), dispatcher.clone(), identity.clone());
        let monitor_service = MonitorService::new(database.clone(), config);

        Self {
            database,
            dispatcher,
            identity,
            scheduler,
            ping_service,
            monitor_service,
        }
    }
}
