//! Wire types for the OSNIT Shield REST API.
//!
//! These mirror the JSON envelopes byte-for-byte; `sentinel-core`
//! converts them into domain models. Fields the backend only emits for
//! AI-enriched rows are `Option` — ingestion inserts raw records first
//! and the enrichment pass fills in severity, risk, and geodata later.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Accept either a JSON string or a bare number for label-ish fields
/// (the trends endpoint has emitted both across backend versions).
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        S(String),
        N(i64),
        F(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::S(s) => s,
        Raw::N(n) => n.to_string(),
        Raw::F(f) => f.to_string(),
    })
}

// ── /intelligence/summary ────────────────────────────────────────────

/// Aggregate KPIs, refreshed wholesale each poll.
///
/// `severity_breakdown` keeps the server's key order — the severity
/// chart is rendered in exactly that order.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub severity_breakdown: IndexMap<String, u64>,
    #[serde(default)]
    pub total_incidents: u64,
    #[serde(default)]
    pub total_alerts: u64,
    #[serde(default)]
    pub average_risk_score: f64,
    #[serde(default)]
    pub incidents_last_24h: u64,
    #[serde(default)]
    pub top_incident_types: Vec<TypeCountResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeCountResponse {
    #[serde(alias = "type")]
    pub incident_type: String,
    pub count: u64,
}

// ── /intelligence/trends ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TrendsResponse {
    #[serde(default)]
    pub hourly_trends: Vec<TrendPointResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendPointResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub hour: String,
    #[serde(default)]
    pub incident_count: u64,
}

// ── /intelligence/alerts ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub alerts: Vec<AlertResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertResponse {
    pub id: i64,
    #[serde(default)]
    pub alert_level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── /intelligence/top-threats ────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TopThreatsResponse {
    #[serde(default)]
    pub top_threats: Vec<ThreatResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreatResponse {
    pub id: i64,
    #[serde(default)]
    pub incident_type: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub cluster_id: Option<i64>,
}

// ── /intelligence/spikes ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SpikesResponse {
    #[serde(default)]
    pub spikes: Vec<SpikeResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpikeResponse {
    pub incident_type: String,
    #[serde(default)]
    pub previous_count: u64,
    #[serde(default)]
    pub current_count: u64,
    #[serde(default)]
    pub growth_rate: f64,
}

// ── /incidents and /incidents/map ────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct MapResponse {
    #[serde(default)]
    pub incidents: Vec<IncidentResponse>,
}

/// A raw incident record. The bare `/incidents` list returns an array
/// of these; `/incidents/map` wraps the geo-tagged subset.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentResponse {
    pub id: i64,
    #[serde(default)]
    pub incident_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub cluster_id: Option<i64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub collected_at: Option<String>,
}

// ── /operations/status ───────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
}
