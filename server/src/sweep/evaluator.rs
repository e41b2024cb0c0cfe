//! Pure per-monitor transition rule, evaluated once per sweep tick.
//!
//! Deadline comparisons are inclusive: `now >= deadline` transitions, so a
//! ping landing in the same instant as the deadline is on time only if its
//! write reaches storage before the sweep reads the monitor.

use chrono::{DateTime, Duration, Utc};

use crate::database::{MonitorRecord, MonitorStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// Not evaluable: paused, never pinged, or no deadline
    Skip,
    /// Within the expected interval; nothing to do
    OnTime,
    /// Deadline passed but still inside the grace window
    EnterGrace,
    /// Already in grace, still inside the window
    StillGrace,
    /// Past the grace window
    MarkDown {
        /// Status was already `down` before this tick
        already_down: bool,
        /// Alert this incident: first observation of `down`, or a
        /// crash/restart left it `down` without a completed alert attempt
        needs_alert: bool,
    },
}

pub fn evaluate(monitor: &MonitorRecord, now: DateTime<Utc>) -> SweepAction {
    // Paused monitors are excluded at load time; kept as a guard against
    // a pause racing the sweep
    if monitor.is_paused || monitor.status == MonitorStatus::Paused {
        return SweepAction::Skip;
    }

    if monitor.status == MonitorStatus::New && monitor.last_ping_at.is_none() {
        return SweepAction::Skip;
    }

    let Some(next_expected_at) = monitor.next_expected_at else {
        return SweepAction::Skip;
    };

    if now < next_expected_at {
        return SweepAction::OnTime;
    }

    let grace_deadline = next_expected_at + Duration::seconds(monitor.grace_seconds);
    if now < grace_deadline {
        return if monitor.status == MonitorStatus::Grace {
            SweepAction::StillGrace
        } else {
            SweepAction::EnterGrace
        };
    }

    let already_down = monitor.status == MonitorStatus::Down;
    SweepAction::MarkDown {
        already_down,
        needs_alert: !already_down || monitor.last_alert_at.is_none(),
    }
}
