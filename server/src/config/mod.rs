// File: server/src/config/mod.rs
pub mod manager;
pub use manager::ConfigManager;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{limits, sweep};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database path (overridable via DATABASE_PATH)
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Shared secret for the sweep trigger endpoint (overridable via SWEEP_SECRET)
    #[serde(default)]
    pub sweep_secret: String,

    /// Built-in sweep cadence. 0 disables the internal ticker and leaves
    /// sweeping entirely to the external cron trigger.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,

    /// Upper bound on monitors evaluated concurrently per sweep
    #[serde(default = "default_max_concurrent_checks")]
    pub max_concurrent_checks: usize,

    /// Per-user monitor quota
    #[serde(default = "default_monitor_quota")]
    pub max_monitors_per_user: i64,

    /// Public base URL used in alert bodies (dashboard links)
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Resend API key for email alerts (overridable via RESEND_API_KEY);
    /// the email channel is disabled when unset
    #[serde(default)]
    pub resend_api_key: Option<String>,

    #[serde(default = "default_alert_from")]
    pub alert_from_address: String,

    /// Owner directory: user id -> notification email. Stands in for the
    /// external identity provider, which is out of scope here.
    #[serde(default)]
    pub users: HashMap<String, String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8095
}

fn default_database_path() -> String {
    "data/monitors.db".to_string()
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_max_concurrent_checks() -> usize {
    sweep::DEFAULT_MAX_CONCURRENT_CHECKS
}

fn default_monitor_quota() -> i64 {
    limits::DEFAULT_MONITOR_QUOTA
}

fn default_app_url() -> String {
    "http://localhost:8095".to_string()
}

fn default_alert_from() -> String {
    "Alerts <alerts@localhost>".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            sweep_secret: String::new(),
            sweep_interval_seconds: default_sweep_interval(),
            max_concurrent_checks: default_max_concurrent_checks(),
            max_monitors_per_user: default_monitor_quota(),
            app_url: default_app_url(),
            resend_api_key: None,
            alert_from_address: default_alert_from(),
            users: HashMap::new(),
        }
    }
}
