use indexmap::IndexMap;

/// Aggregate KPIs for the overview screen, refreshed wholesale each poll.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// Severity label -> incident count, in the server's own order.
    /// Kept as a map rather than per-severity fields: the backend only
    /// emits labels that have at least one incident.
    pub severity_breakdown: IndexMap<String, u64>,
    pub total_incidents: u64,
    pub total_alerts: u64,
    pub average_risk_score: f64,
    pub incidents_last_24h: u64,
    pub top_incident_types: Vec<TypeCount>,
}

/// One bar of the severity chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityCount {
    pub name: String,
    pub count: u64,
}

/// An incident type with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub incident_type: String,
    pub count: u64,
}

impl Summary {
    /// Rows for the severity bar chart, in breakdown order.
    pub fn severity_chart_data(&self) -> Vec<SeverityCount> {
        self.severity_breakdown
            .iter()
            .map(|(name, count)| SeverityCount {
                name: name.clone(),
                count: *count,
            })
            .collect()
    }

    /// Count for a given severity label, zero when absent.
    pub fn severity_count(&self, label: &str) -> u64 {
        self.severity_breakdown.get(label).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(pairs: &[(&str, u64)]) -> IndexMap<String, u64> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    #[test]
    fn chart_data_preserves_breakdown_order() {
        let summary = Summary {
            severity_breakdown: breakdown(&[("low", 5), ("medium", 3), ("high", 2)]),
            ..Default::default()
        };

        let rows = summary.severity_chart_data();
        assert_eq!(
            rows,
            vec![
                SeverityCount { name: "low".into(), count: 5 },
                SeverityCount { name: "medium".into(), count: 3 },
                SeverityCount { name: "high".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn severity_count_defaults_to_zero() {
        let summary = Summary {
            severity_breakdown: breakdown(&[("high", 2)]),
            ..Default::default()
        };

        assert_eq!(summary.severity_count("high"), 2);
        assert_eq!(summary.severity_count("critical"), 0);
    }
}
