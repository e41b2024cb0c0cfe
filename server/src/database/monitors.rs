//! Monitor reads, writes, and the alert check-and-set.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, error};

use super::records::{MonitorRecord, MonitorStatus, MonitorUpdate};
use super::Database;

const MONITOR_COLUMNS: &str = r#"
    id, user_id, name, slug, interval_seconds, grace_seconds, status,
    last_ping_at, next_expected_at, last_alert_at,
    alert_email, webhook_url, is_paused, created_at, updated_at
"#;

fn row_to_monitor(row: &SqliteRow) -> Result<MonitorRecord> {
    let status: String = row.try_get("status")?;
    Ok(MonitorRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        interval_seconds: row.try_get("interval_seconds")?,
        grace_seconds: row.try_get("grace_seconds")?,
        status: MonitorStatus::parse(&status)?,
        last_ping_at: row.try_get("last_ping_at")?,
        next_expected_at: row.try_get("next_expected_at")?,
        last_alert_at: row.try_get("last_alert_at")?,
        alert_email: row.try_get("alert_email")?,
        webhook_url: row.try_get("webhook_url")?,
        is_paused: row.try_get("is_paused")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn insert_monitor(&self, monitor: &MonitorRecord) -> Result<()> {
        debug!("Inserting monitor {} ({})", monitor.name, monitor.id);

        match sqlx::query(
            r#"
            INSERT INTO monitors (
                id, user_id, name, slug, interval_seconds, grace_seconds, status,
                last_ping_at, next_expected_at, last_alert_at,
                alert_email, webhook_url, is_paused, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&monitor.id)
        .bind(&monitor.user_id)
        .bind(&monitor.name)
        .bind(&monitor.slug)
        .bind(monitor.interval_seconds)
        .bind(monitor.grace_seconds)
        .bind(monitor.status.as_str())
        .bind(monitor.last_ping_at)
        .bind(monitor.next_expected_at)
        .bind(monitor.last_alert_at)
        .bind(monitor.alert_email)
        .bind(&monitor.webhook_url)
        .bind(monitor.is_paused)
        .bind(monitor.created_at)
        .bind(monitor.updated_at)
        .execute(self.pool())
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to insert monitor {}: {}", monitor.id, e);
                Err(e.into())
            }
        }
    }

    pub async fn find_monitor_by_slug(&self, slug: &str) -> Result<Option<MonitorRecord>> {
        let sql = format!("SELECT {} FROM monitors WHERE slug = ?", MONITOR_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(row_to_monitor).transpose()
    }

    pub async fn find_monitor_by_id(&self, id: &str) -> Result<Option<MonitorRecord>> {
        let sql = format!("SELECT {} FROM monitors WHERE id = ?", MONITOR_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(row_to_monitor).transpose()
    }

    pub async fn list_monitors_for_user(&self, user_id: &str) -> Result<Vec<MonitorRecord>> {
        let sql = format!(
            "SELECT {} FROM monitors WHERE user_id = ? ORDER BY created_at DESC",
            MONITOR_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(row_to_monitor).collect()
    }

    pub async fn count_monitors_for_user(&self, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM monitors WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// All monitors the sweep evaluates: not paused, in an active status.
    pub async fn list_sweepable_monitors(&self) -> Result<Vec<MonitorRecord>> {
        let sql = format!(
            r#"
            SELECT {} FROM monitors
            WHERE is_paused = 0 AND status IN ('new', 'up', 'grace', 'down')
            "#,
            MONITOR_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;
        rows.iter().map(row_to_monitor).collect()
    }

    /// Happy-path update from ping ingest: advance the deadline, record the
    /// ping time, set the new status, and optionally reset the alert
    /// de-duplication key (down -> up recovery).
    pub async fn apply_ping(
        &self,
        monitor_id: &str,
        pinged_at: DateTime<Utc>,
        next_expected_at: DateTime<Utc>,
        status: MonitorStatus,
        clear_last_alert: bool,
    ) -> Result<()> {
        let result = if clear_last_alert {
            sqlx::query(
                r#"
                UPDATE monitors
                SET last_ping_at = ?, next_expected_at = ?, status = ?,
                    last_alert_at = NULL, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(pinged_at)
            .bind(next_expected_at)
            .bind(status.as_str())
            .bind(pinged_at)
            .bind(monitor_id)
            .execute(self.pool())
            .await
        } else {
            sqlx::query(
                r#"
                UPDATE monitors
                SET last_ping_at = ?, next_expected_at = ?, status = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(pinged_at)
            .bind(next_expected_at)
            .bind(status.as_str())
            .bind(pinged_at)
            .bind(monitor_id)
            .execute(self.pool())
            .await
        };

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to apply ping to monitor {}: {}", monitor_id, e);
                Err(e.into())
            }
        }
    }

    /// Unhappy-path status transition from the sweep (up -> grace,
    /// grace -> down). Never touches the alert key.
    pub async fn set_monitor_status(
        &self,
        monitor_id: &str,
        status: MonitorStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE monitors SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(now)
            .bind(monitor_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Conditional check-and-set of the alert de-duplication key. Only one
    /// concurrent sweep can win the claim for a given incident; the others
    /// see `false` and must not count the alert again.
    pub async fn mark_monitor_alerted(
        &self,
        monitor_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE monitors
            SET last_alert_at = ?, status = 'down', updated_at = ?
            WHERE id = ? AND last_alert_at IS NULL
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(monitor_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Applies a validated PATCH. Toggling the pause flag resets status:
    /// paused while suspended, back to `new` on unpause (stale baseline).
    pub async fn update_monitor_settings(
        &self,
        monitor_id: &str,
        update: &MonitorUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<MonitorRecord>> {
        let Some(existing) = self.find_monitor_by_id(monitor_id).await? else {
            return Ok(None);
        };

        let name = update.name.clone().unwrap_or(existing.name);
        let alert_email = update.alert_email.unwrap_or(existing.alert_email);
        let webhook_url = match &update.webhook_url {
            None => existing.webhook_url,
            Some(url) if url.is_empty() => None,
            Some(url) => Some(url.clone()),
        };
        let (is_paused, status) = match update.is_paused {
            None => (existing.is_paused, existing.status),
            Some(true) => (true, MonitorStatus::Paused),
            Some(false) => (false, MonitorStatus::New),
        };

        sqlx::query(
            r#"
            UPDATE monitors
            SET name = ?, alert_email = ?, webhook_url = ?, is_paused = ?,
                status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(alert_email)
        .bind(&webhook_url)
        .bind(is_paused)
        .bind(status.as_str())
        .bind(now)
        .bind(monitor_id)
        .execute(self.pool())
        .await?;

        self.find_monitor_by_id(monitor_id).await
    }

    /// Deletes a monitor and everything it owns. Pings and alert logs go
    /// first so a failure cannot orphan them.
    pub async fn delete_monitor(&self, monitor_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM pings WHERE monitor_id = ?")
            .bind(monitor_id)
            .execute(self.pool())
            .await?;
        sqlx::query("DELETE FROM alert_logs WHERE monitor_id = ?")
            .bind(monitor_id)
            .execute(self.pool())
            .await?;
        sqlx::query("DELETE FROM monitors WHERE id = ?")
            .bind(monitor_id)
            .execute(self.pool())
            .await?;
        debug!("Deleted monitor {} with its pings and alert logs", monitor_id);
        Ok(())
    }
}
