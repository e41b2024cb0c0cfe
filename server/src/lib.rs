pub mod alerts;
pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod identity;
pub mod services;
pub mod ssrf;
pub mod sweep;
pub mod web;

// Re-export commonly used types
pub use alerts::{AlertDispatcher, ResendMailer};
pub use config::{Config, ConfigManager};
pub use database::Database;
pub use errors::ServiceError;
pub use identity::{ConfigIdentityProvider, IdentityProvider};
pub use services::{MonitorService, PingService};
pub use sweep::SweepScheduler;
