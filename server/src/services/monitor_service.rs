//! Monitor CRUD with validation, quota enforcement, and slug generation.
//!
//! The slug doubles as the bearer credential for the ping endpoint, so it
//! is generated from OS-grade randomness and is never derivable from the
//! internal id.

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::constants::{limits, slug};
use crate::database::{Database, MonitorRecord, MonitorStatus, MonitorUpdate};
use crate::errors::ServiceError;
use crate::ssrf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Minutes,
    Hours,
    Days,
}

impl IntervalUnit {
    /// Converts to seconds; `None` on overflow. Range validation against
    /// the product limits happens at the call site.
    pub fn to_seconds(self, value: i64) -> Option<i64> {
        let factor = match self {
            IntervalUnit::Minutes => 60,
            IntervalUnit::Hours => 3600,
            IntervalUnit::Days => 86400,
        };
        value.checked_mul(factor)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMonitorInput {
    pub name: String,
    pub interval_value: i64,
    pub interval_unit: IntervalUnit,
    #[serde(default)]
    pub grace_value: i64,
    #[serde(default = "default_grace_unit")]
    pub grace_unit: IntervalUnit,
    #[serde(default = "default_alert_email")]
    pub alert_email: bool,
    pub webhook_url: Option<String>,
}

fn default_grace_unit() -> IntervalUnit {
    IntervalUnit::Minutes
}

fn default_alert_email() -> bool {
    true
}

pub struct MonitorService {
    database: Arc<Database>,
    config: Arc<Config>,
}

impl MonitorService {
    pub fn new(database: Arc<Database>, config: Arc<Config>) -> Self {
        Self { database, config }
    }

    pub async fn create_monitor(
        &self,
        user_id: &str,
        input: CreateMonitorInput,
    ) -> Result<MonitorRecord, ServiceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ServiceError::invalid("Monitor name is required"));
        }
        if name.len() > limits::MAX_NAME_LENGTH {
            return Err(ServiceError::invalid(format!(
                "Monitor name must be {} characters or less",
                limits::MAX_NAME_LENGTH
            )));
        }
        if input.interval_value < 1 {
            return Err(ServiceError::invalid("Interval must be at least 1"));
        }
        if input.grace_value < 0 {
            return Err(ServiceError::invalid("Grace period cannot be negative"));
        }

        let interval_seconds = input
            .interval_unit
            .to_seconds(input.interval_value)
            .filter(|s| *s <= limits::MAX_INTERVAL_SECONDS)
            .ok_or_else(|| ServiceError::invalid("Interval must be at most one year"))?;
        let grace_seconds = input
            .grace_unit
            .to_seconds(input.grace_value)
            .filter(|s| *s <= limits::MAX_INTERVAL_SECONDS)
            .ok_or_else(|| ServiceError::invalid("Grace period must be at most one year"))?;

        let webhook_url = match input.webhook_url.as_deref() {
            None | Some("") => None,
            Some(url) => {
                ssrf::validate_webhook_url(url).await?;
                Some(url.to_string())
            }
        };

        let count = self.database.count_monitors_for_user(user_id).await?;
        if count >= self.config.max_monitors_per_user {
            return Err(ServiceError::invalid(format!(
                "Monitor limit reached. Maximum {} monitors allowed.",
                self.config.max_monitors_per_user
            )));
        }

        let now = Utc::now();
        let monitor = MonitorRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            slug: generate_slug(),
            interval_seconds,
            grace_seconds,
            status: MonitorStatus::New,
            last_ping_at: None,
            next_expected_at: None,
            last_alert_at: None,
            alert_email: input.alert_email,
            webhook_url,
            is_paused: false,
            created_at: now,
            updated_at: now,
        };

        self.database.insert_monitor(&monitor).await?;
        info!("Created monitor {} for user {}", monitor.name, user_id);
        Ok(monitor)
    }

    pub async fn list_monitors(&self, user_id: &str) -> Result<Vec<MonitorRecord>, ServiceError> {
        Ok(self.database.list_monitors_for_user(user_id).await?)
    }

    pub async fn get_monitor(
        &self,
        user_id: &str,
        monitor_id: &str,
    ) -> Result<MonitorRecord, ServiceError> {
        let monitor = self
            .database
            .find_monitor_by_id(monitor_id)
            .await?
            .filter(|m| m.user_id == user_id)
            .ok_or_else(|| ServiceError::not_found("Not found"))?;
        Ok(monitor)
    }

    /// Applies a restricted-allowlist PATCH. Toggling pause resets status
    /// (`paused` or back to `new`); history is never cleared.
    pub async fn update_monitor(
        &self,
        user_id: &str,
        monitor_id: &str,
        update: MonitorUpdate,
    ) -> Result<MonitorRecord, ServiceError> {
        // Ownership check before any mutation
        self.get_monitor(user_id, monitor_id).await?;

        if let Some(name) = update.name.as_deref() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(ServiceError::invalid("Monitor name is required"));
            }
            if trimmed.len() > limits::MAX_NAME_LENGTH {
                return Err(ServiceError::invalid(format!(
                    "Monitor name must be {} characters or less",
                    limits::MAX_NAME_LENGTH
                )));
            }
        }

        if let Some(url) = update.webhook_url.as_deref() {
            if !url.is_empty() {
                ssrf::validate_webhook_url(url).await?;
            }
        }

        let updated = self
            .database
            .update_monitor_settings(monitor_id, &update, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::not_found("Not found"))?;
        Ok(updated)
    }

    /// Deletes the monitor and cascades to its pings and alert logs.
    pub async fn delete_monitor(
        &self,
        user_id: &str,
        monitor_id: &str,
    ) -> Result<(), ServiceError> {
        self.get_monitor(user_id, monitor_id).await?;
        self.database.delete_monitor(monitor_id).await?;
        info!("Deleted monitor {} for user {}", monitor_id, user_id);
        Ok(())
    }
}

/// High-entropy URL-safe slug, distinct from the internal id.
pub fn generate_slug() -> String {
    let bytes: [u8; slug::SLUG_RANDOM_BYTES] = rand::random();
    hex::encode(bytes)
}
