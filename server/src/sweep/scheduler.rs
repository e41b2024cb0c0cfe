//! Sweep Scheduler: evaluates every active monitor against its deadline
//! and drives at-most-one-alert-per-incident dispatch.
//!
//! Invoked on a fixed cadence (built-in ticker and/or the authenticated
//! HTTP trigger). Safe to invoke twice in quick succession: transitions
//! are idempotent and the alert claim is a conditional update, so
//! double-evaluation degrades to redundant no-ops, not double alerts.

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::evaluator::{evaluate, SweepAction};
use super::SweepSummary;
use crate::alerts::AlertDispatcher;
use crate::database::{Database, MonitorRecord, MonitorStatus};
use crate::identity::IdentityProvider;

/// Per-monitor evaluation outcome, folded into the sweep summary.
#[derive(Debug, Default)]
struct MonitorOutcome {
    alerted: bool,
    errors: Vec<String>,
}

pub struct SweepScheduler {
    database: Arc<Database>,
    dispatcher: Arc<AlertDispatcher>,
    identity: Arc<dyn IdentityProvider>,
    max_concurrent_checks: usize,
}

impl SweepScheduler {
    pub fn new(
        database: Arc<Database>,
        dispatcher: Arc<AlertDispatcher>,
        identity: Arc<dyn IdentityProvider>,
        max_concurrent_checks: usize,
    ) -> Self {
        Self {
            database,
            dispatcher,
            identity,
            max_concurrent_checks: max_concurrent_checks.max(1),
        }
    }

    pub async fn run_sweep(&self) -> Result<SweepSummary> {
        self.run_sweep_at(Utc::now()).await
    }

    /// One full sweep tick against a fixed `now`. Loads all active
    /// monitors and evaluates them with bounded concurrency; a failure in
    /// one monitor never aborts the batch.
    pub async fn run_sweep_at(&self, now: DateTime<Utc>) -> Result<SweepSummary> {
        let monitors = self.database.list_sweepable_monitors().await?;
        if monitors.is_empty() {
            debug!("Sweep tick: no active monitors");
            return Ok(SweepSummary::default());
        }

        let checked = monitors.len() as u64;
        let outcomes: Vec<MonitorOutcome> = stream::iter(
            monitors
                .into_iter()
                .map(|monitor| self.check_monitor(monitor, now)),
        )
        .buffer_unordered(self.max_concurrent_checks)
        .collect()
        .await;

        let mut summary = SweepSummary {
            checked,
            ..Default::default()
        };
        for outcome in outcomes {
            if outcome.alerted {
                summary.alerted += 1;
            }
            summary.errors.extend(outcome.errors);
        }

        if summary.alerted > 0 || !summary.errors.is_empty() {
            info!(
                "Sweep finished: {} checked, {} alerted, {} errors",
                summary.checked,
                summary.alerted,
                summary.errors.len()
            );
        } else {
            debug!("Sweep finished: {} checked, all quiet", summary.checked);
        }

        Ok(summary)
    }

    async fn check_monitor(&self, monitor: MonitorRecord, now: DateTime<Utc>) -> MonitorOutcome {
        match self.check_monitor_inner(&monitor, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Error checking monitor {}: {}", monitor.id, e);
                MonitorOutcome {
                    alerted: false,
                    errors: vec![format!("Error checking monitor {}: {}", monitor.id, e)],
                }
            }
        }
    }

    async fn check_monitor_inner(
        &self,
        monitor: &MonitorRecord,
        now: DateTime<Utc>,
    ) -> Result<MonitorOutcome> {
        match evaluate(monitor, now) {
            SweepAction::Skip | SweepAction::OnTime | SweepAction::StillGrace => {
                Ok(MonitorOutcome::default())
            }
            SweepAction::EnterGrace => {
                self.database
                    .set_monitor_status(&monitor.id, MonitorStatus::Grace, now)
                    .await?;
                debug!("Monitor {} entered grace window", monitor.name);
                Ok(MonitorOutcome::default())
            }
            SweepAction::MarkDown {
                already_down,
                needs_alert,
            } => {
                if !already_down {
                    self.database
                        .set_monitor_status(&monitor.id, MonitorStatus::Down, now)
                        .await?;
                    info!("Monitor {} is down", monitor.name);
                }

                if !needs_alert {
                    return Ok(MonitorOutcome::default());
                }

                self.alert_incident(monitor, now).await
            }
        }
    }

    /// Dispatches the down alert for a fresh incident, then claims the
    /// de-duplication key. The attempt always precedes the claim so that a
    /// crash before delivery leaves `last_alert_at` unset and the next
    /// tick re-arms. The claim itself is conditional, so an overlapping
    /// sweep that lost the race does not count the alert a second time.
    async fn alert_incident(
        &self,
        monitor: &MonitorRecord,
        now: DateTime<Utc>,
    ) -> Result<MonitorOutcome> {
        let owner_email = self.identity.email_for(&monitor.user_id);
        if owner_email.is_none() {
            warn!(
                "No owner email resolvable for monitor {} (user {})",
                monitor.name, monitor.user_id
            );
        }

        let report = self
            .dispatcher
            .send_down_alerts(monitor, owner_email.as_deref())
            .await;

        let mut errors = Vec::new();
        if report.any_failed() {
            errors.push(format!(
                "Alert partially failed for monitor {}: {}",
                monitor.name,
                report.failure_messages().join(", ")
            ));
        }

        // The incident counts as alerted once any attempt was made (even a
        // failed one); re-attempting every tick would be an alert storm.
        // The transition is authoritative regardless of delivery success.
        // The claim is still set with zero configured channels so the
        // incident is not re-dispatched every tick, but an attempt-free
        // dispatch never counts toward `alerted`.
        let claimed = self.database.mark_monitor_alerted(&monitor.id, now).await?;
        if !claimed {
            debug!(
                "Monitor {} was already claimed by a concurrent sweep",
                monitor.id
            );
        }

        Ok(MonitorOutcome {
            alerted: claimed && report.attempted(),
            errors,
        })
    }
}
