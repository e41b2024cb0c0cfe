//! Integration tests for the alert dispatcher
//!
//! Uses wiremock servers standing in for a chat webhook endpoint and the
//! Resend email API, verifying channel fan-out, partial-failure tolerance,
//! payload shape, and the per-attempt audit log.

mod common;

use std::sync::Arc;

use common::fixtures::*;
use server::alerts::{AlertDispatcher, ResendMailer};
use server::database::Database;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn dispatcher_with_mailer(
    database: Arc<Database>,
    email_endpoint: &str,
) -> AlertDispatcher {
    let mailer = ResendMailer::with_endpoint(
        "re_test_key".to_string(),
        "Alerts <alerts@example.com>".to_string(),
        email_endpoint.to_string(),
    );
    AlertDispatcher::new(database, Some(mailer), "http://localhost:8095".to_string())
}

#[tokio::test]
async fn webhook_only_dispatch_succeeds_and_is_logged() {
    let webhook = MockWebhookServer::start().await;
    webhook.mock_success().await;

    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("webhook-only")
        .alert_email(false)
        .webhook_url(&webhook.webhook_url())
        .build();

    let report = stack
        .dispatcher
        .send_down_alerts(&monitor, Some(TEST_USER_EMAIL))
        .await;

    assert_eq!(report.results.len(), 1);
    assert!(report.any_succeeded());
    assert!(!report.any_failed());

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    let requests = webhook.get_captured_requests().await;
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert_eq!(body["text"].as_str().unwrap(), "Monitor DOWN: webhook-only");
    assert_eq!(body["embeds"][0]["color"].as_u64().unwrap(), 0xef4444);
}

#[tokio::test]
async fn webhook_failure_is_reported_with_status() {
    let webhook = MockWebhookServer::start().await;
    webhook.mock_failure(500).await;

    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("failing-webhook")
        .alert_email(false)
        .webhook_url(&webhook.webhook_url())
        .build();

    let report = stack
        .dispatcher
        .send_down_alerts(&monitor, Some(TEST_USER_EMAIL))
        .await;

    assert!(report.any_failed());
    let messages = report.failure_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("500"));
}

#[tokio::test]
async fn email_channel_posts_to_mail_api_with_bearer_auth() {
    let mail_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(bearer_token("re_test_key"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mail_server)
        .await;

    let database = Arc::new(Database::new_in_memory().await.unwrap());
    let dispatcher =
        dispatcher_with_mailer(database.clone(), &format!("{}/emails", mail_server.uri())).await;

    let monitor = MonitorBuilder::new("email-job").build();
    database.insert_monitor(&monitor).await.unwrap();

    let report = dispatcher
        .send_down_alerts(&monitor, Some(TEST_USER_EMAIL))
        .await;

    assert_eq!(report.results.len(), 1);
    assert!(report.any_succeeded());

    let logs = database.list_alert_logs_for_monitor(&monitor.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].channel, "email");
    assert!(logs[0].success);
}

#[tokio::test]
async fn one_broken_channel_does_not_stop_the_other() {
    let webhook = MockWebhookServer::start().await;
    webhook.mock_success().await;

    let mail_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mail_server)
        .await;

    let database = Arc::new(Database::new_in_memory().await.unwrap());
    let dispatcher =
        dispatcher_with_mailer(database.clone(), &format!("{}/emails", mail_server.uri())).await;

    let monitor = MonitorBuilder::new("mixed-channels")
        .webhook_url(&webhook.webhook_url())
        .build();
    database.insert_monitor(&monitor).await.unwrap();

    let report = dispatcher
        .send_down_alerts(&monitor, Some(TEST_USER_EMAIL))
        .await;

    assert_eq!(report.results.len(), 2);
    assert!(report.any_succeeded());
    assert!(report.any_failed());

    // Both attempts leave an audit row
    let logs = database.list_alert_logs_for_monitor(&monitor.id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs.iter().filter(|l| l.success).count(), 1);
}

#[tokio::test]
async fn nothing_is_attempted_without_configured_channels() {
    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("silent-job").alert_email(false).build();

    let report = stack
        .dispatcher
        .send_down_alerts(&monitor, Some(TEST_USER_EMAIL))
        .await;
    assert!(!report.attempted());
}

#[tokio::test]
async fn email_preference_without_mailer_skips_the_channel() {
    // TestStack carries no mail API key, so the email channel is disabled
    let stack = TestStack::new().await;
    assert!(!stack.dispatcher.email_channel_enabled());

    let webhook = MockWebhookServer::start().await;
    webhook.mock_success().await;

    let monitor = MonitorBuilder::new("wants-email")
        .webhook_url(&webhook.webhook_url())
        .build();

    let report = stack
        .dispatcher
        .send_down_alerts(&monitor, Some(TEST_USER_EMAIL))
        .await;

    // Only the webhook attempt shows up
    assert_eq!(report.results.len(), 1);
    assert!(report.any_succeeded());
}

#[tokio::test]
async fn recovery_dispatch_uses_green_payload() {
    let webhook = MockWebhookServer::start().await;
    webhook.mock_success().await;

    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("recovered-job")
        .alert_email(false)
        .webhook_url(&webhook.webhook_url())
        .build();

    let report = stack
        .dispatcher
        .send_recovery_alerts(&monitor, Some(TEST_USER_EMAIL))
        .await;
    assert!(report.any_succeeded());

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    let requests = webhook.get_captured_requests().await;
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert!(body["text"].as_str().unwrap().contains("RECOVERED"));
    assert_eq!(body["embeds"][0]["color"].as_u64().unwrap(), 0x22c55e);
}

#[tokio::test]
async fn test_webhook_distinguishes_rejection_from_transport_failure() {
    let webhook = MockWebhookServer::start().await;
    webhook.mock_failure(404).await;

    let stack = TestStack::new().await;
    let result = stack.dispatcher.send_test_webhook(&webhook.webhook_url()).await;
    match result {
        Err(server::alerts::webhook::TestSendError::Delivery { status, .. }) => {
            assert_eq!(status, 404)
        }
        other => panic!("Expected delivery rejection, got {:?}", other.err()),
    }
}
