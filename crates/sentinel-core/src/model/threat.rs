/// A high-risk incident from the ranked top-threats feed.
#[derive(Debug, Clone)]
pub struct Threat {
    pub id: i64,
    pub incident_type: String,
    pub risk_score: f64,
    /// Cluster assignment from the AI engine; raw rows have none yet.
    pub cluster_id: Option<i64>,
}
