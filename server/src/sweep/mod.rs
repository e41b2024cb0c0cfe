//! Sweep side of the monitor state machine.
//!
//! `evaluator` holds the pure per-monitor transition rule; `scheduler`
//! drives it across all active monitors on each tick and hands alertable
//! transitions to the Alert Dispatcher.

pub mod evaluator;
pub mod scheduler;

pub use evaluator::{evaluate, SweepAction};
pub use scheduler::SweepScheduler;

use serde::Serialize;

/// Aggregate result of one sweep tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    pub checked: u64,
    pub alerted: u64,
    /// Recovery alerting is owned by ping ingest (the only observer of the
    /// down -> up edge), so the sweep itself always reports zero here.
    pub recovered: u64,
    pub errors: Vec<String>,
}
