//! Database record types (entities).
//!
//! Three logical tables related by monitor id:
//! - `monitors` - the unit of observation, exclusively owned by one user
//! - `pings` - append-only liveness events, never updated
//! - `alert_logs` - append-only delivery audit, never read back to drive logic

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monitor lifecycle status. `paused` overlays any state while the pause
/// flag is set; unpausing resets to `new` since the schedule baseline is
/// stale after an unknown pause duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    New,
    Up,
    Grace,
    Down,
    Paused,
}

impl MonitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorStatus::New => "new",
            MonitorStatus::Up => "up",
            MonitorStatus::Grace => "grace",
            MonitorStatus::Down => "down",
            MonitorStatus::Paused => "paused",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "new" => Ok(MonitorStatus::New),
            "up" => Ok(MonitorStatus::Up),
            "grace" => Ok(MonitorStatus::Grace),
            "down" => Ok(MonitorStatus::Down),
            "paused" => Ok(MonitorStatus::Paused),
            other => Err(anyhow!("Unknown monitor status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Unguessable public slug; the bearer credential for the ping endpoint.
    /// High-entropy random, never derivable from the id.
    pub slug: String,
    pub interval_seconds: i64,
    pub grace_seconds: i64,
    pub status: MonitorStatus,
    pub last_ping_at: Option<DateTime<Utc>>,
    /// Null only while status is `new` and no ping was ever received
    pub next_expected_at: Option<DateTime<Utc>>,
    /// De-duplication key: timestamp of the most recent alert for the
    /// current incident, cleared on recovery
    pub last_alert_at: Option<DateTime<Utc>>,
    pub alert_email: bool,
    pub webhook_url: Option<String>,
    pub is_paused: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingRecord {
    pub monitor_id: String,
    pub received_at: DateTime<Utc>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertLogRecord {
    pub monitor_id: String,
    /// "email" or "webhook"
    pub channel: String,
    pub message: String,
    pub success: bool,
    pub error: Option<String>,
    pub sent_at: DateTime<Utc>,
}

/// Validated PATCH payload for a monitor. Only these fields are mutable;
/// everything else is ignored by the update path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorUpdate {
    pub name: Option<String>,
    pub is_paused: Option<bool>,
    pub alert_email: Option<bool>,
    /// Some("") clears the webhook, Some(url) replaces it
    pub webhook_url: Option<String>,
}
