#![allow(clippy::unwrap_used)]
// Integration tests for `ShieldClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sentinel_api::{Error, ShieldClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ShieldClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ShieldClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Intelligence tests ──────────────────────────────────────────────

#[tokio::test]
async fn test_get_summary() {
    let (server, client) = setup().await;

    let body = json!({
        "severity_breakdown": { "low": 5, "medium": 3, "high": 2 },
        "total_incidents": 10,
        "total_alerts": 4,
        "average_risk_score": 0.42,
        "incidents_last_24h": 6,
        "top_incident_types": [
            { "incident_type": "ddos", "count": 4 },
            { "incident_type": "phishing", "count": 3 }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/intelligence/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let summary = client.get_summary().await.unwrap();

    assert_eq!(summary.total_incidents, 10);
    assert_eq!(summary.total_alerts, 4);
    assert_eq!(summary.incidents_last_24h, 6);
    // Key order must survive deserialization — the chart depends on it.
    let keys: Vec<&str> = summary
        .severity_breakdown
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["low", "medium", "high"]);
    assert_eq!(summary.top_incident_types[0].incident_type, "ddos");
}

#[tokio::test]
async fn test_get_trends_numeric_hour() {
    let (server, client) = setup().await;

    // Older backend builds emitted bare hour numbers.
    let body = json!({
        "hourly_trends": [
            { "hour": 13, "incident_count": 7 },
            { "hour": "14:00", "incident_count": 2 }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/intelligence/trends"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let trends = client.get_trends().await.unwrap();

    assert_eq!(trends.hourly_trends.len(), 2);
    assert_eq!(trends.hourly_trends[0].hour, "13");
    assert_eq!(trends.hourly_trends[1].hour, "14:00");
    assert_eq!(trends.hourly_trends[0].incident_count, 7);
}

#[tokio::test]
async fn test_get_alerts_with_limit() {
    let (server, client) = setup().await;

    let body = json!({
        "alerts": [
            { "id": 1, "alert_level": "high", "message": "surge detected" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/intelligence/alerts"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let alerts = client.get_alerts(Some(5)).await.unwrap();

    assert_eq!(alerts.alerts.len(), 1);
    assert_eq!(alerts.alerts[0].alert_level.as_deref(), Some("high"));
    assert_eq!(alerts.alerts[0].message.as_deref(), Some("surge detected"));
}

#[tokio::test]
async fn test_get_top_threats() {
    let (server, client) = setup().await;

    let body = json!({
        "top_threats": [
            { "id": 9, "incident_type": "ddos", "risk_score": 0.91, "cluster_id": 2 },
            { "id": 4, "incident_type": "malware", "risk_score": 0.77, "cluster_id": null }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/intelligence/top-threats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let threats = client.get_top_threats(None).await.unwrap();

    assert_eq!(threats.top_threats.len(), 2);
    assert_eq!(threats.top_threats[0].id, 9);
    assert_eq!(threats.top_threats[1].cluster_id, None);
}

// ── Incident tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_incidents_bare_array() {
    let (server, client) = setup().await;

    // The raw list endpoint has no envelope.
    let body = json!([
        {
            "id": 101,
            "incident_type": "phishing",
            "severity": "medium",
            "risk_score": 0.4,
            "source": "rss",
            "content": "Suspicious campaign reported",
            "collected_at": "2025-06-15T10:30:00"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let incidents = client.list_incidents(None, None).await.unwrap();

    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].id, 101);
    assert_eq!(incidents[0].severity.as_deref(), Some("medium"));
}

#[tokio::test]
async fn test_list_incidents_severity_param() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/incidents"))
        .and(query_param("severity", "high"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let incidents = client.list_incidents(Some(50), Some("high")).await.unwrap();

    assert!(incidents.is_empty());
}

#[tokio::test]
async fn test_get_map_incidents() {
    let (server, client) = setup().await;

    let body = json!({
        "incidents": [
            {
                "id": 7,
                "latitude": 51.5,
                "longitude": -0.12,
                "incident_type": "protest",
                "risk_score": 0.6,
                "severity": "high",
                "cluster_id": 1,
                "source": "gdelt"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/incidents/map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let map = client.get_map_incidents().await.unwrap();

    assert_eq!(map.incidents.len(), 1);
    assert_eq!(map.incidents[0].latitude, Some(51.5));
}

// ── Operations tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_scheduler_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/operations/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "running": true })))
        .mount(&server)
        .await;

    let status = client.get_scheduler_status().await.unwrap();

    assert!(status.running);
}

#[tokio::test]
async fn test_run_ingestion_posts() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/operations/run-ingestion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "started" })))
        .expect(1)
        .mount(&server)
        .await;

    client.run_ingestion().await.unwrap();
}

#[tokio::test]
async fn test_run_ai_failure_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/operations/run-ai"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "pipeline crashed" })),
        )
        .mount(&server)
        .await;

    let result = client.run_ai().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(
                message.contains("pipeline crashed"),
                "expected detail in message, got: {message}"
            );
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_malformed_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/intelligence/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let result = client.get_summary().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert_eq!(body, "not json at all");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/intelligence/spikes"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = client.get_spikes().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream down");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
