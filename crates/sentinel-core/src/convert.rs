// ── Wire → domain conversions ──
//
// sentinel-api types mirror the JSON; these impls shape them into
// domain models. Parsing is lenient: a malformed field degrades that
// field, never the whole record.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use sentinel_api::types;

use crate::model::{Alert, Incident, Severity, Spike, Summary, Threat, TrendPoint, TypeCount};

impl From<types::SummaryResponse> for Summary {
    fn from(raw: types::SummaryResponse) -> Self {
        Self {
            severity_breakdown: raw.severity_breakdown,
            total_incidents: raw.total_incidents,
            total_alerts: raw.total_alerts,
            average_risk_score: raw.average_risk_score,
            incidents_last_24h: raw.incidents_last_24h,
            top_incident_types: raw
                .top_incident_types
                .into_iter()
                .map(|t| TypeCount {
                    incident_type: t.incident_type,
                    count: t.count,
                })
                .collect(),
        }
    }
}

impl From<types::TrendPointResponse> for TrendPoint {
    fn from(raw: types::TrendPointResponse) -> Self {
        Self {
            hour: raw.hour,
            incident_count: raw.incident_count,
        }
    }
}

impl From<types::AlertResponse> for Alert {
    fn from(raw: types::AlertResponse) -> Self {
        let level = raw
            .alert_level
            .as_deref()
            .and_then(parse_severity)
            .unwrap_or(Severity::Low);

        Self {
            id: raw.id,
            level,
            message: raw.message.unwrap_or_default(),
        }
    }
}

impl From<types::ThreatResponse> for Threat {
    fn from(raw: types::ThreatResponse) -> Self {
        Self {
            id: raw.id,
            incident_type: raw.incident_type.unwrap_or_else(|| "unknown".to_owned()),
            risk_score: raw.risk_score.unwrap_or(0.0),
            cluster_id: raw.cluster_id,
        }
    }
}

impl From<types::SpikeResponse> for Spike {
    fn from(raw: types::SpikeResponse) -> Self {
        Self {
            incident_type: raw.incident_type,
            previous_count: raw.previous_count,
            current_count: raw.current_count,
            growth_rate: raw.growth_rate,
        }
    }
}

impl From<types::IncidentResponse> for Incident {
    fn from(raw: types::IncidentResponse) -> Self {
        Self {
            id: raw.id,
            incident_type: raw.incident_type,
            severity: raw.severity.as_deref().and_then(parse_severity),
            risk_score: raw.risk_score,
            latitude: raw.latitude,
            longitude: raw.longitude,
            cluster_id: raw.cluster_id,
            source: raw.source,
            content: raw.content,
            collected_at: raw.collected_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// Parse a severity label, logging (not failing) on unknown values.
fn parse_severity(raw: &str) -> Option<Severity> {
    match raw.parse() {
        Ok(s) => Some(s),
        Err(_) => {
            debug!(value = raw, "unknown severity label");
            None
        }
    }
}

/// Parse backend timestamps: RFC 3339 first, then the naive SQL form
/// the ingestion layer writes (assumed UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    debug!(value = raw, "unparseable timestamp");
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_accepts_rfc3339_and_naive() {
        assert!(parse_timestamp("2025-06-15T10:30:00Z").is_some());
        assert!(parse_timestamp("2025-06-15T10:30:00").is_some());
        assert!(parse_timestamp("2025-06-15 10:30:00.123").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn alert_level_falls_back_to_low() {
        let alert: Alert = types::AlertResponse {
            id: 1,
            alert_level: Some("weird".into()),
            message: None,
            created_at: None,
        }
        .into();

        assert_eq!(alert.level, Severity::Low);
        assert!(alert.message.is_empty());
    }

    #[test]
    fn incident_keeps_unenriched_fields_none() {
        let incident: Incident = types::IncidentResponse {
            id: 42,
            incident_type: None,
            severity: None,
            risk_score: None,
            latitude: None,
            longitude: None,
            cluster_id: None,
            source: Some("rss".into()),
            content: Some("raw report".into()),
            collected_at: Some("2025-06-15T10:30:00".into()),
        }
        .into();

        assert_eq!(incident.type_label(), "unclassified");
        assert!(incident.position().is_none());
        assert!(incident.collected_at.is_some());
    }
}
