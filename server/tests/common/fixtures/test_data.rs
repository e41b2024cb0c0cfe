//! Monitor record builder for seeding test databases

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use server::database::{Database, MonitorRecord, MonitorStatus};

use super::TEST_USER;

/// Builder for monitor records with sensible defaults: a 60s interval,
/// 30s grace, owned by the fixture test user, email alerts on.
pub struct MonitorBuilder {
    record: MonitorRecord,
}

impl MonitorBuilder {
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        let record = MonitorRecord {
            id: Uuid::new_v4().to_string(),
            user_id: TEST_USER.to_string(),
            name: name.to_string(),
            slug: hex::encode(rand::random::<[u8; 16]>()),
            interval_seconds: 60,
            grace_seconds: 30,
            status: MonitorStatus::New,
            last_ping_at: None,
            next_expected_at: None,
            last_alert_at: None,
            alert_email: true,
            webhook_url: None,
            is_paused: false,
            created_at: now,
            updated_at: now,
        };
        Self { record }
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.record.user_id = user_id.to_string();
        self
    }

    pub fn interval_seconds(mut self, seconds: i64) -> Self {
        self.record.interval_seconds = seconds;
        self
    }

    pub fn grace_seconds(mut self, seconds: i64) -> Self {
        self.record.grace_seconds = seconds;
        self
    }

    pub fn status(mut self, status: MonitorStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn last_ping_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.last_ping_at = Some(at);
        self
    }

    pub fn next_expected_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.next_expected_at = Some(at);
        self
    }

    pub fn last_alert_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.last_alert_at = Some(at);
        self
    }

    pub fn alert_email(mut self, enabled: bool) -> Self {
        self.record.alert_email = enabled;
        self
    }

    pub fn webhook_url(mut self, url: &str) -> Self {
        self.record.webhook_url = Some(url.to_string());
        self
    }

    pub fn paused(mut self) -> Self {
        self.record.is_paused = true;
        self.record.status = MonitorStatus::Paused;
        self
    }

    /// Seed the monitor as healthy: last ping `age` ago, deadline one
    /// interval after that.
    pub fn pinged_ago(mut self, age: Duration) -> Self {
        let pinged_at = Utc::now() - age;
        self.record.last_ping_at = Some(pinged_at);
        self.record.next_expected_at =
            Some(pinged_at + Duration::seconds(self.record.interval_seconds));
        self.record.status = MonitorStatus::Up;
        self
    }

    pub fn build(self) -> MonitorRecord {
        self.record
    }

    pub async fn insert(self, database: &Database) -> MonitorRecord {
        let record = self.record;
        database
            .insert_monitor(&record)
            .await
            .expect("Failed to insert test monitor");
        record
    }
}
