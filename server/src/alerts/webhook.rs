//! Webhook alert delivery.
//!
//! Payloads are structured for common chat-webhook consumers: a plain
//! `text` summary plus a Discord-style embed carrying the monitor name,
//! expected interval, last-ping time, a status color, and a timestamp.

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{format_interval, AlertKind};
use crate::constants::http;
use crate::database::MonitorRecord;

const COLOR_DOWN: u32 = 0xef4444;
const COLOR_RECOVERED: u32 = 0x22c55e;

/// Failure modes of a test-send, kept separate so the web boundary can
/// distinguish a downstream rejection (422) from a transport error (500).
#[derive(Debug)]
pub enum TestSendError {
    /// The endpoint answered with a non-success status
    Delivery { status: u16, body: String },
    /// The request never completed
    Transport(String),
}

impl std::fmt::Display for TestSendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestSendError::Delivery { status, body } => {
                write!(f, "Webhook returned {}: {}", status, body)
            }
            TestSendError::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn build_alert_payload(monitor: &MonitorRecord, kind: AlertKind) -> Value {
    let is_down = kind == AlertKind::Down;
    let status_label = if is_down { "DOWN" } else { "RECOVERED" };
    let color = if is_down { COLOR_DOWN } else { COLOR_RECOVERED };
    let last_ping = monitor
        .last_ping_at
        .map(|t| t.to_rfc2822())
        .unwrap_or_else(|| "Never".to_string());

    json!({
        // Slack-compatible summary
        "text": format!("Monitor {}: {}", status_label, monitor.name),
        // Discord-compatible embed
        "embeds": [{
            "title": format!("{}: {}", status_label, monitor.name),
            "description": if is_down {
                "Monitor has not received a ping within the expected window."
            } else {
                "Monitor is back online and pinging normally."
            },
            "color": color,
            "fields": [
                { "name": "Monitor", "value": monitor.name, "inline": true },
                { "name": "Expected", "value": format_interval(monitor.interval_seconds), "inline": true },
                { "name": "Last Ping", "value": last_ping, "inline": false },
            ],
            "timestamp": Utc::now().to_rfc3339(),
        }],
    })
}

pub async fn send_webhook_alert(
    client: &Client,
    url: &str,
    monitor: &MonitorRecord,
    kind: AlertKind,
) -> Result<(), String> {
    let payload = build_alert_payload(monitor, kind);
    post_payload(client, url, &payload).await.map(|_| {
        debug!("Webhook alert delivered for monitor {}", monitor.name);
    })
}

pub async fn send_test_webhook(client: &Client, url: &str) -> Result<(), TestSendError> {
    let payload = json!({
        "text": "Test webhook - your integration is working!",
        "embeds": [{
            "title": "Webhook Test Successful",
            "description": "This is a test notification. Your webhook is configured correctly.",
            "color": COLOR_RECOVERED,
            "timestamp": Utc::now().to_rfc3339(),
        }],
    });

    match timeout(http::WEBHOOK_TIMEOUT, client.post(url).json(&payload).send()).await {
        Ok(Ok(response)) => {
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                let body = response.text().await.unwrap_or_default();
                Err(TestSendError::Delivery {
                    status: status.as_u16(),
                    body: truncate(&body, 200),
                })
            }
        }
        Ok(Err(e)) => Err(TestSendError::Transport(e.to_string())),
        Err(_) => Err(TestSendError::Transport("Webhook timeout".to_string())),
    }
}

async fn post_payload(client: &Client, url: &str, payload: &Value) -> Result<(), String> {
    match timeout(http::WEBHOOK_TIMEOUT, client.post(url).json(payload).send()).await {
        Ok(Ok(response)) => {
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                let body = response.text().await.unwrap_or_default();
                let err = format!("Webhook returned {}: {}", status.as_u16(), truncate(&body, 200));
                warn!("{}", err);
                Err(err)
            }
        }
        Ok(Err(e)) => {
            warn!("Webhook delivery failed: {}", e);
            Err(e.to_string())
        }
        Err(_) => {
            warn!("Webhook delivery timed out");
            Err("Webhook timeout".to_string())
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
