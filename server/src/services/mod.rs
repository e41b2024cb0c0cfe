// File: server/src/services/mod.rs

pub mod monitor_service;
pub mod ping_service;

pub use monitor_service::{CreateMonitorInput, IntervalUnit, MonitorService};
pub use ping_service::{PingService, RecordedPing};
