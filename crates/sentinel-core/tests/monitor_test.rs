#![allow(clippy::unwrap_used)]
// Integration tests for the Monitor sync loop using wiremock.
//
// The mock backend serves all eight endpoints; individual tests knock
// endpoints over to exercise partial-failure isolation, the in-flight
// guard, and the operation → refresh relay.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sentinel_core::{Monitor, MonitorConfig, Severity, SyncState};

// ── Helpers ─────────────────────────────────────────────────────────

fn summary_body(total_incidents: u64) -> serde_json::Value {
    json!({
        "severity_breakdown": { "low": 5, "medium": 3, "high": 2 },
        "total_incidents": total_incidents,
        "total_alerts": 4,
        "average_risk_score": 0.42,
        "incidents_last_24h": 6,
        "top_incident_types": [{ "incident_type": "ddos", "count": 4 }]
    })
}

fn incident_body(id: i64, severity: &str) -> serde_json::Value {
    json!({
        "id": id,
        "incident_type": "ddos",
        "severity": severity,
        "risk_score": 0.8,
        "latitude": 48.85,
        "longitude": 2.35,
        "cluster_id": 1,
        "source": "rss",
        "content": "report",
        "collected_at": "2025-06-15T10:30:00"
    })
}

/// Mount the full happy-path backend.
async fn mount_happy_path(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/intelligence/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(10)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/intelligence/trends"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hourly_trends": [
                { "hour": "13:00", "incident_count": 7 },
                { "hour": "14:00", "incident_count": 2 }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/intelligence/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alerts": [{ "id": 1, "alert_level": "high", "message": "surge" }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/intelligence/top-threats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "top_threats": [
                { "id": 9, "incident_type": "ddos", "risk_score": 0.91, "cluster_id": 2 }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/intelligence/spikes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spikes": [{
                "incident_type": "ddos",
                "previous_count": 4,
                "current_count": 6,
                "growth_rate": 0.5
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/incidents/map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "incidents": [incident_body(7, "high")]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/incidents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([incident_body(101, "medium"), incident_body(102, "high")])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "running": true })))
        .mount(server)
        .await;
}

/// Monitor wired to the mock server, periodic refresh disabled so
/// tests drive every batch explicitly.
fn monitor_for(server: &MockServer) -> Monitor {
    let config = MonitorConfig {
        url: server.uri().parse().unwrap(),
        refresh_interval_secs: 0,
        ..Default::default()
    };
    Monitor::new(config)
}

// ── Initial batch ───────────────────────────────────────────────────

#[tokio::test]
async fn initial_batch_populates_every_slice() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();

    let store = monitor.store();
    assert_eq!(store.sync_state(), SyncState::Ready);
    assert_eq!(store.summary_snapshot().unwrap().total_incidents, 10);
    assert_eq!(store.trends_snapshot().len(), 2);
    assert_eq!(store.alerts_snapshot().len(), 1);
    assert_eq!(store.top_threats_snapshot().len(), 1);
    assert_eq!(store.spikes_snapshot().len(), 1);
    assert_eq!(store.map_incident_count(), 1);
    assert_eq!(store.incidents_snapshot().len(), 2);
    assert_eq!(store.scheduler_running(), Some(true));
    assert!(store.last_refresh().is_some());
}

#[tokio::test]
async fn stays_loading_until_first_summary_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/intelligence/summary"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();
    assert_eq!(monitor.store().sync_state(), SyncState::Loading);

    // Backend recovers; the next poll flips the state.
    server.reset().await;
    mount_happy_path(&server).await;
    monitor.refresh().await;

    assert_eq!(monitor.store().sync_state(), SyncState::Ready);
}

// ── Partial-failure isolation ───────────────────────────────────────

#[tokio::test]
async fn failed_endpoint_keeps_previous_slice() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();
    assert_eq!(monitor.store().trends_snapshot().len(), 2);

    // Trends endpoint dies; summary moves on.
    server.reset().await;
    mount_happy_path(&server).await;
    Mock::given(method("GET"))
        .and(path("/intelligence/trends"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/intelligence/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(99)))
        .mount(&server)
        .await;

    monitor.refresh().await;

    let store = monitor.store();
    // Summary updated, stale-but-present trends survive.
    assert_eq!(store.summary_snapshot().unwrap().total_incidents, 99);
    assert_eq!(store.trends_snapshot().len(), 2);
}

// ── Overlapping refresh ─────────────────────────────────────────────

#[tokio::test]
async fn overlapping_refresh_is_dropped() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/intelligence/summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(summary_body(11))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Second call lands while the first batch is in flight.
    tokio::join!(monitor.refresh(), monitor.refresh());

    // The .expect(1) on the summary mock verifies only one batch ran.
    assert_eq!(monitor.store().summary_snapshot().unwrap().total_incidents, 11);
}

// ── Severity filter ─────────────────────────────────────────────────

#[tokio::test]
async fn severity_filter_scopes_the_list_fetch() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/incidents"))
        .and(query_param("severity", "high"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([incident_body(102, "high")])))
        .expect(1)
        .mount(&server)
        .await;

    monitor.filter_by_severity(Some(Severity::High)).await;

    let store = monitor.store();
    assert_eq!(store.severity_filter(), Some(Severity::High));
    let incidents = store.incidents_snapshot();
    assert_eq!(incidents.len(), 1);
    assert!(incidents.iter().all(|i| i.severity == Some(Severity::High)));
}

#[tokio::test]
async fn periodic_batch_respects_active_filter() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();
    monitor.filter_by_severity(Some(Severity::High)).await;

    server.reset().await;
    mount_happy_path(&server).await;
    Mock::given(method("GET"))
        .and(path("/incidents"))
        .and(query_param("severity", "high"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([incident_body(102, "high")])))
        .expect(1)
        .mount(&server)
        .await;

    monitor.refresh().await;

    assert_eq!(monitor.store().incidents_snapshot().len(), 1);
}

#[tokio::test]
async fn failed_filtered_fetch_keeps_previous_list() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();
    let before = monitor.store().incidents_snapshot();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/incidents"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    monitor.filter_by_severity(Some(Severity::Critical)).await;

    let store = monitor.store();
    // Filter recorded, list untouched.
    assert_eq!(store.severity_filter(), Some(Severity::Critical));
    assert_eq!(store.incidents_snapshot().len(), before.len());
}

// ── Operations ──────────────────────────────────────────────────────

#[tokio::test]
async fn run_ingestion_records_timestamp_then_refreshes_once() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();
    assert!(monitor.store().last_ingestion().is_none());

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/operations/run-ingestion"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/intelligence/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(12)))
        .expect(1)
        .mount(&server)
        .await;

    monitor.run_ingestion().await.unwrap();

    let store = monitor.store();
    assert!(store.last_ingestion().is_some());
    // The follow-up refresh picked up the post-ingestion state.
    assert_eq!(store.summary_snapshot().unwrap().total_incidents, 12);
}

#[tokio::test]
async fn failed_operation_sets_no_timestamp_and_skips_refresh() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let monitor = monitor_for(&server);
    monitor.connect().await.unwrap();

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/operations/run-ai"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/intelligence/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(13)))
        .expect(0)
        .mount(&server)
        .await;

    let result = monitor.run_ai().await;

    assert!(result.is_err());
    assert!(monitor.store().last_ai_run().is_none());
}

// ── Teardown ────────────────────────────────────────────────────────

#[tokio::test]
async fn shutdown_joins_background_tasks() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let config = MonitorConfig {
        url: server.uri().parse().unwrap(),
        refresh_interval_secs: 3600, // spawned but never fires in-test
        ..Default::default()
    };
    let monitor = Monitor::new(config);
    monitor.connect().await.unwrap();

    monitor.shutdown().await;

    // A refresh after shutdown is a no-op (client dropped, no panic).
    monitor.refresh().await;
}
