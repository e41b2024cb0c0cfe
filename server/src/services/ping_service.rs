//! Ping Ingest: the happy path of the monitor state machine.
//!
//! Latency-critical: remote cron jobs block on this response. The only
//! synchronous work is the ping insert and the monitor update; recovery
//! alert delivery is handed to a background task.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::alerts::AlertDispatcher;
use crate::constants::slug;
use crate::database::{Database, MonitorStatus, PingRecord};
use crate::errors::ServiceError;
use crate::identity::IdentityProvider;

#[derive(Debug, Clone)]
pub struct RecordedPing {
    pub slug: String,
    pub pinged_at: DateTime<Utc>,
    pub next_expected_at: DateTime<Utc>,
}

pub struct PingService {
    database: Arc<Database>,
    dispatcher: Arc<AlertDispatcher>,
    identity: Arc<dyn IdentityProvider>,
}

impl PingService {
    pub fn new(
        database: Arc<Database>,
        dispatcher: Arc<AlertDispatcher>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            database,
            dispatcher,
            identity,
        }
    }

    /// Records a liveness ping and advances the monitor's schedule.
    ///
    /// The ping row is appended even for paused monitors (audit
    /// continuity), but a failed insert fails the whole call: this write
    /// is the answer to "was I alive", so storage errors must surface.
    /// Multiple pings within one interval are safe; each just pushes the
    /// deadline further out.
    pub async fn record_ping(
        &self,
        slug_value: &str,
        source_ip: &str,
        user_agent: Option<&str>,
    ) -> Result<RecordedPing, ServiceError> {
        // Reject obviously invalid slugs before wasting a lookup
        if slug_value.len() < slug::MIN_SLUG_LENGTH {
            return Err(ServiceError::invalid("Invalid monitor ID"));
        }

        let monitor = self
            .database
            .find_monitor_by_slug(slug_value)
            .await?
            .ok_or_else(|| ServiceError::not_found("Monitor not found"))?;

        let now = Utc::now();
        self.database
            .insert_ping(&PingRecord {
                monitor_id: monitor.id.clone(),
                received_at: now,
                source_ip: Some(source_ip.to_string()),
                user_agent: user_agent.map(str::to_string),
            })
            .await?;

        let next_expected_at = now + Duration::seconds(monitor.interval_seconds);
        let new_status = if monitor.is_paused {
            MonitorStatus::Paused
        } else {
            MonitorStatus::Up
        };

        // Recovery: this is the only point where the down -> up edge is
        // directly observed. Clearing last_alert_at re-arms alerting for
        // the next independent incident.
        let was_down = monitor.status == MonitorStatus::Down;

        self.database
            .apply_ping(&monitor.id, now, next_expected_at, new_status, was_down)
            .await?;

        if was_down && !monitor.is_paused {
            info!("Monitor {} recovered", monitor.name);
            self.spawn_recovery_dispatch(monitor);
        } else {
            debug!("Ping recorded for monitor {}", monitor.name);
        }

        Ok(RecordedPing {
            slug: slug_value.to_string(),
            pinged_at: now,
            next_expected_at,
        })
    }

    /// Fire-and-forget recovery notification; the HTTP response must not
    /// wait on outbound delivery. Failures are logged per channel by the
    /// dispatcher and additionally surfaced here.
    fn spawn_recovery_dispatch(&self, monitor: crate::database::MonitorRecord) {
        let dispatcher = self.dispatcher.clone();
        let owner_email = self.identity.email_for(&monitor.user_id);

        tokio::spawn(async move {
            let report = dispatcher
                .send_recovery_alerts(&monitor, owner_email.as_deref())
                .await;
            if report.any_failed() {
                warn!(
                    "Recovery alert partially failed for monitor {}: {}",
                    monitor.name,
                    report.failure_messages().join(", ")
                );
            }
        });
    }
}
