//! Alert Dispatcher: multi-channel fan-out with partial-failure tolerance.
//!
//! Given a monitor and a down/recovered transition, attempts every
//! configured channel (email, webhook) with a bounded timeout, records one
//! audit row per attempt, and reports per-channel outcomes. A single
//! channel failure never aborts the others and never rolls back the state
//! transition that triggered the dispatch.

pub mod email;
pub mod webhook;

pub use email::ResendMailer;

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::constants::http;
use crate::database::{AlertLogRecord, Database, MonitorRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertChannel {
    Email,
    Webhook,
}

impl AlertChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertChannel::Email => "email",
            AlertChannel::Webhook => "webhook",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Down,
    Recovered,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelResult {
    pub channel: AlertChannel,
    pub success: bool,
    pub error: Option<String>,
}

/// Aggregate of one dispatch. The caller treats the incident as alerted
/// when any attempt was made at all, not only when one succeeded, so a
/// permanently broken webhook cannot cause indefinite retry storms.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub results: Vec<ChannelResult>,
}

impl DispatchReport {
    pub fn attempted(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn any_succeeded(&self) -> bool {
        self.results.iter().any(|r| r.success)
    }

    pub fn any_failed(&self) -> bool {
        self.results.iter().any(|r| !r.success)
    }

    pub fn failure_messages(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| {
                format!(
                    "{}: {}",
                    r.channel.as_str(),
                    r.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect()
    }
}

/// "Every 5 minutes" / "Every 2 hours" / "Every 1 day" for alert bodies.
pub fn format_interval(seconds: i64) -> String {
    if seconds % 86400 == 0 && seconds >= 86400 {
        let days = seconds / 86400;
        format!("Every {} day{}", days, if days > 1 { "s" } else { "" })
    } else if seconds % 3600 == 0 && seconds >= 3600 {
        let hours = seconds / 3600;
        format!("Every {} hour{}", hours, if hours > 1 { "s" } else { "" })
    } else {
        let minutes = (seconds as f64 / 60.0).round().max(1.0) as i64;
        format!(
            "Every {} minute{}",
            minutes,
            if minutes > 1 { "s" } else { "" }
        )
    }
}

pub struct AlertDispatcher {
    client: Client,
    mailer: Option<ResendMailer>,
    database: Arc<Database>,
    app_url: String,
}

impl AlertDispatcher {
    pub fn new(database: Arc<Database>, mailer: Option<ResendMailer>, app_url: String) -> Self {
        let client = Client::builder()
            .timeout(http::WEBHOOK_TIMEOUT)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client for AlertDispatcher");

        Self {
            client,
            mailer,
            database,
            app_url,
        }
    }

    pub fn email_channel_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    pub async fn send_down_alerts(
        &self,
        monitor: &MonitorRecord,
        owner_email: Option<&str>,
    ) -> DispatchReport {
        self.dispatch(monitor, owner_email, AlertKind::Down).await
    }

    pub async fn send_recovery_alerts(
        &self,
        monitor: &MonitorRecord,
        owner_email: Option<&str>,
    ) -> DispatchReport {
        self.dispatch(monitor, owner_email, AlertKind::Recovered)
            .await
    }

    /// Fan out to each configured channel in isolation. Every attempt is
    /// awaited here (the caller decides on `last_alert_at` from the
    /// report) and every attempt leaves an audit row.
    async fn dispatch(
        &self,
        monitor: &MonitorRecord,
        owner_email: Option<&str>,
        kind: AlertKind,
    ) -> DispatchReport {
        let mut results = Vec::new();
        let kind_label = match kind {
            AlertKind::Down => "down",
            AlertKind::Recovered => "recovery",
        };

        if monitor.alert_email {
            if let Some(to) = owner_email {
                if let Some(mailer) = &self.mailer {
                    let outcome = match kind {
                        AlertKind::Down => mailer.send_down_email(to, monitor, &self.app_url).await,
                        AlertKind::Recovered => {
                            mailer.send_recovery_email(to, monitor, &self.app_url).await
                        }
                    };
                    let (success, error) = match outcome {
                        Ok(()) => (true, None),
                        Err(e) => (false, Some(e)),
                    };
                    self.log_alert(
                        monitor,
                        AlertChannel::Email,
                        &format!("{} alert to {}", kind_label, to),
                        success,
                        error.clone(),
                    )
                    .await;
                    results.push(ChannelResult {
                        channel: AlertChannel::Email,
                        success,
                        error,
                    });
                } else {
                    warn!(
                        "Email alert requested for monitor {} but no mail API key is configured",
                        monitor.name
                    );
                }
            }
        }

        if let Some(url) = &monitor.webhook_url {
            let outcome = webhook::send_webhook_alert(&self.client, url, monitor, kind).await;
            let (success, error) = match outcome {
                Ok(()) => (true, None),
                Err(e) => (false, Some(e)),
            };
            self.log_alert(
                monitor,
                AlertChannel::Webhook,
                &format!("{} alert webhook", kind_label),
                success,
                error.clone(),
            )
            .await;
            results.push(ChannelResult {
                channel: AlertChannel::Webhook,
                success,
                error,
            });
        }

        DispatchReport { results }
    }

    /// Sends the verification payload used by the webhook test endpoint.
    pub async fn send_test_webhook(&self, url: &str) -> Result<(), webhook::TestSendError> {
        webhook::send_test_webhook(&self.client, url).await
    }

    async fn log_alert(
        &self,
        monitor: &MonitorRecord,
        channel: AlertChannel,
        message: &str,
        success: bool,
        error: Option<String>,
    ) {
        let log = AlertLogRecord {
            monitor_id: monitor.id.clone(),
            channel: channel.as_str().to_string(),
            message: message.to_string(),
            success,
            error,
            sent_at: Utc::now(),
        };
        // Audit write is best effort; losing a log row must not fail the
        // dispatch that already happened
        if let Err(e) = self.database.insert_alert_log(&log).await {
            warn!(
                "Failed to write alert log for monitor {}: {}",
                monitor.id, e
            );
        }
    }
}
