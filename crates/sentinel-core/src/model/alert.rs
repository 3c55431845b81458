use super::Severity;

/// A derived notification tied to an incident or pattern.
#[derive(Debug, Clone)]
pub struct Alert {
    pub id: i64,
    pub level: Severity,
    pub message: String,
}
