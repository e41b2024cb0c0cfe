// File: server/src/web/handlers/mod.rs

pub mod common;
pub mod health;
pub mod monitors;
pub mod ping;
pub mod sweep;
pub mod webhooks;

pub use health::health;
pub use monitors::{create_monitor, delete_monitor, get_monitor, list_monitors, update_monitor};
pub use ping::record_ping;
pub use sweep::run_sweep;
pub use webhooks::test_webhook;
