//! Ping event operations. The table is append-only; rows are only removed
//! when their monitor is deleted.

use anyhow::Result;
use tracing::{debug, error};

use super::records::PingRecord;
use super::Database;

impl Database {
    pub async fn insert_ping(&self, ping: &PingRecord) -> Result<()> {
        debug!("Recording ping for monitor {}", ping.monitor_id);

        match sqlx::query(
            r#"
            INSERT INTO pings (monitor_id, received_at, source_ip, user_agent)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&ping.monitor_id)
        .bind(ping.received_at)
        .bind(&ping.source_ip)
        .bind(&ping.user_agent)
        .execute(self.pool())
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(
                    "Failed to record ping for monitor {}: {}",
                    ping.monitor_id, e
                );
                Err(e.into())
            }
        }
    }

    pub async fn count_pings_for_monitor(&self, monitor_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pings WHERE monitor_id = ?")
            .bind(monitor_id)
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
