//! Application-wide constants for timeouts, limits, and validation rules.

#![allow(dead_code)] // Some constants are defined for future use

use std::time::Duration;

/// Slug policy for the public ping endpoint
pub mod slug {
    /// Slugs shorter than this are rejected before any storage lookup
    pub const MIN_SLUG_LENGTH: usize = 8;

    /// Random bytes per generated slug (hex-encoded to twice this length)
    pub const SLUG_RANDOM_BYTES: usize = 16;
}

/// Outbound HTTP delivery timeouts
pub mod http {
    use super::Duration;

    /// Timeout for a single webhook delivery attempt
    pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for a single email delivery attempt
    pub const EMAIL_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for establishing outbound connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Monitor validation limits
pub mod limits {
    /// Maximum monitor name length in characters
    pub const MAX_NAME_LENGTH: usize = 100;

    /// Minimum expected interval between pings (one minute)
    pub const MIN_INTERVAL_SECONDS: i64 = 60;

    /// Maximum expected interval and grace period (one year); also the
    /// overflow guard for unit conversion
    pub const MAX_INTERVAL_SECONDS: i64 = 365 * 86400;

    /// Default per-user monitor quota when not configured
    pub const DEFAULT_MONITOR_QUOTA: i64 = 20;
}

/// Sweep scheduler tuning
pub mod sweep {
    /// Default upper bound on monitors evaluated concurrently per sweep
    pub const DEFAULT_MAX_CONCURRENT_CHECKS: usize = 8;
}

/// Email delivery endpoint (Resend HTTP API)
pub mod email {
    pub const RESEND_API_URL: &str = "https://api.resend.com/emails";
}
