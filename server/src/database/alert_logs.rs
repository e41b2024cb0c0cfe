//! Alert delivery audit trail. One row per delivery attempt, success or
//! not. Used only for observability; de-duplication relies on the
//! monitor's `last_alert_at`, never on these rows.

use anyhow::Result;
use sqlx::Row;
use tracing::error;

use super::records::AlertLogRecord;
use super::Database;

impl Database {
    pub async fn insert_alert_log(&self, log: &AlertLogRecord) -> Result<()> {
        match sqlx::query(
            r#"
            INSERT INTO alert_logs (monitor_id, channel, message, success, error, sent_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.monitor_id)
        .bind(&log.channel)
        .bind(&log.message)
        .bind(log.success)
        .bind(&log.error)
        .bind(log.sent_at)
        .execute(self.pool())
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(
                    "Failed to record alert log for monitor {}: {}",
                    log.monitor_id, e
                );
                Err(e.into())
            }
        }
    }

    pub async fn list_alert_logs_for_monitor(
        &self,
        monitor_id: &str,
    ) -> Result<Vec<AlertLogRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT monitor_id, channel, message, success, error, sent_at
            FROM alert_logs
            WHERE monitor_id = ?
            ORDER BY sent_at DESC
            "#,
        )
        .bind(monitor_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                Ok(AlertLogRecord {
                    monitor_id: row.try_get("monitor_id")?,
                    channel: row.try_get("channel")?,
                    message: row.try_get("message")?,
                    success: row.try_get("success")?,
                    error: row.try_get("error")?,
                    sent_at: row.try_get("sent_at")?,
                })
            })
            .collect()
    }
}
