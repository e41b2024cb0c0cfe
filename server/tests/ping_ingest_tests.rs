//! Integration tests for ping ingest
//!
//! Covers slug validation, deadline advancement, paused monitors, and the
//! down -> up recovery edge that re-arms alerting.

mod common;

use chrono::{Duration, Utc};
use common::fixtures::*;
use server::database::MonitorStatus;
use server::errors::ServiceError;

#[tokio::test]
async fn rejects_short_slug_without_touching_storage() {
    let stack = TestStack::new().await;

    let result = stack.ping_service.record_ping("abc", "1.2.3.4", None).await;
    assert!(matches!(result, Err(ServiceError::Invalid(_))));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let stack = TestStack::new().await;

    let result = stack
        .ping_service
        .record_ping("deadbeefdeadbeefdeadbeefdeadbeef", "1.2.3.4", None)
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn ping_records_row_and_advances_deadline() {
    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("backup-job")
        .interval_seconds(300)
        .insert(&stack.database)
        .await;

    let before = Utc::now();
    let recorded = stack
        .ping_service
        .record_ping(&monitor.slug, "10.1.2.3", Some("curl/8.0"))
        .await
        .expect("ping should succeed");

    assert_eq!(recorded.slug, monitor.slug);
    assert_eq!(
        recorded.next_expected_at,
        recorded.pinged_at + Duration::seconds(300)
    );
    assert!(recorded.pinged_at >= before);

    let updated = stack
        .database
        .find_monitor_by_id(&monitor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, MonitorStatus::Up);
    assert_eq!(updated.last_ping_at, Some(recorded.pinged_at));
    assert_eq!(updated.next_expected_at, Some(recorded.next_expected_at));

    let count = stack
        .database
        .count_pings_for_monitor(&monitor.id)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn repeated_pings_keep_pushing_the_deadline_out() {
    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("frequent-pinger")
        .interval_seconds(60)
        .insert(&stack.database)
        .await;

    let mut last_deadline = None;
    for _ in 0..3 {
        let recorded = stack
            .ping_service
            .record_ping(&monitor.slug, "10.1.2.3", None)
            .await
            .expect("ping should succeed");
        if let Some(previous) = last_deadline {
            assert!(recorded.next_expected_at >= previous);
        }
        last_deadline = Some(recorded.next_expected_at);
    }

    let count = stack
        .database
        .count_pings_for_monitor(&monitor.id)
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn ping_on_paused_monitor_is_recorded_but_keeps_paused_status() {
    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("paused-job")
        .paused()
        .insert(&stack.database)
        .await;

    stack
        .ping_service
        .record_ping(&monitor.slug, "10.1.2.3", None)
        .await
        .expect("ping should succeed");

    let updated = stack
        .database
        .find_monitor_by_id(&monitor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, MonitorStatus::Paused);
    assert!(updated.last_ping_at.is_some());

    let count = stack
        .database
        .count_pings_for_monitor(&monitor.id)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn ping_on_down_monitor_clears_alert_key_and_sends_recovery() {
    let webhook = MockWebhookServer::start().await;
    webhook.mock_success().await;

    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("flaky-job")
        .status(MonitorStatus::Down)
        .alert_email(false)
        .webhook_url(&webhook.webhook_url())
        .last_alert_at(Utc::now() - Duration::minutes(10))
        .next_expected_at(Utc::now() - Duration::minutes(15))
        .insert(&stack.database)
        .await;

    stack
        .ping_service
        .record_ping(&monitor.slug, "10.1.2.3", None)
        .await
        .expect("ping should succeed");

    let updated = stack
        .database
        .find_monitor_by_id(&monitor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, MonitorStatus::Up);
    assert_eq!(updated.last_alert_at, None);

    // Recovery delivery runs in a background task
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    assert_eq!(webhook.request_count().await, 1);
    assert!(webhook.assert_alert_mentions("flaky-job").await);
}

#[tokio::test]
async fn ping_on_healthy_monitor_sends_no_recovery() {
    let webhook = MockWebhookServer::start().await;
    webhook.mock_success().await;

    let stack = TestStack::new().await;
    let monitor = MonitorBuilder::new("steady-job")
        .pinged_ago(Duration::seconds(10))
        .webhook_url(&webhook.webhook_url())
        .insert(&stack.database)
        .await;

    stack
        .ping_service
        .record_ping(&monitor.slug, "10.1.2.3", None)
        .await
        .expect("ping should succeed");

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert_eq!(webhook.request_count().await, 0);
}
