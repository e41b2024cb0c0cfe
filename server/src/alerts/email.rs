//! Email alert delivery through the Resend HTTP API.
//!
//! All user-supplied fields (monitor name, slug) are HTML-escaped before
//! interpolation so a maliciously named monitor cannot inject markup into
//! the alert body.

use reqwest::Client;
use serde_json::json;
use tokio::time::timeout;
use tracing::debug;

use super::format_interval;
use crate::constants::{email, http};
use crate::database::MonitorRecord;

/// Escape user-supplied text for embedding in HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub struct ResendMailer {
    client: Client,
    api_key: String,
    from: String,
    endpoint: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self::with_endpoint(api_key, from, email::RESEND_API_URL.to_string())
    }

    /// Custom API endpoint; used by tests pointing at a mock server.
    pub fn with_endpoint(api_key: String, from: String, endpoint: String) -> Self {
        let client = Client::builder()
            .timeout(http::EMAIL_TIMEOUT)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client for ResendMailer");

        Self {
            client,
            api_key,
            from,
            endpoint,
        }
    }

    pub async fn send_down_email(
        &self,
        to: &str,
        monitor: &MonitorRecord,
        app_url: &str,
    ) -> Result<(), String> {
        let safe_name = escape_html(&monitor.name);
        let safe_slug = escape_html(&monitor.slug);
        let last_ping = monitor
            .last_ping_at
            .map(|t| t.to_rfc2822())
            .unwrap_or_else(|| "Never".to_string());
        let interval = format_interval(monitor.interval_seconds);

        let subject = format!("Monitor DOWN: {}", safe_name);
        let html = format!(
            r#"<html><body style="font-family: sans-serif;">
<h2>Monitor down: {name}</h2>
<p>No ping was received within the expected window.</p>
<table>
<tr><td>Monitor ID</td><td><code>{slug}</code></td></tr>
<tr><td>Expected</td><td>{interval}</td></tr>
<tr><td>Last ping</td><td>{last_ping}</td></tr>
</table>
<p><a href="{app_url}/dashboard">View dashboard</a></p>
<p style="color: #888; font-size: 12px;">You receive this because alerts are enabled for this monitor.</p>
</body></html>"#,
            name = safe_name,
            slug = safe_slug,
            interval = interval,
            last_ping = last_ping,
            app_url = app_url,
        );

        self.send(to, &subject, &html).await
    }

    pub async fn send_recovery_email(
        &self,
        to: &str,
        monitor: &MonitorRecord,
        app_url: &str,
    ) -> Result<(), String> {
        let safe_name = escape_html(&monitor.name);

        let subject = format!("Monitor RECOVERED: {}", safe_name);
        let html = format!(
            r#"<html><body style="font-family: sans-serif;">
<h2>Monitor recovered: {name}</h2>
<p>This monitor is back online and pinging normally.</p>
<p><a href="{app_url}/dashboard">View dashboard</a></p>
</body></html>"#,
            name = safe_name,
            app_url = app_url,
        );

        self.send(to, &subject, &html).await
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), String> {
        let body = json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send();

        match timeout(http::EMAIL_TIMEOUT, request).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    debug!("Alert email accepted for {}", to);
                    Ok(())
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(format!("Mail API returned {}: {}", status.as_u16(), body))
                }
            }
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("Mail API timeout".to_string()),
        }
    }
}
