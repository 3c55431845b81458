use chrono::{DateTime, Utc};

use super::Severity;

/// A single reported security-relevant event.
///
/// Raw rows straight from ingestion only carry `source`/`content`;
/// severity, risk, geodata, and cluster arrive with AI enrichment, so
/// all of those are optional.
#[derive(Debug, Clone)]
pub struct Incident {
    pub id: i64,
    pub incident_type: Option<String>,
    pub severity: Option<Severity>,
    pub risk_score: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cluster_id: Option<i64>,
    pub source: Option<String>,
    pub content: Option<String>,
    pub collected_at: Option<DateTime<Utc>>,
}

impl Incident {
    /// Geographic position, when the enrichment pass produced one.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Type label for display ("unclassified" for raw rows).
    pub fn type_label(&self) -> &str {
        self.incident_type.as_deref().unwrap_or("unclassified")
    }
}
