//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use sentinel_core::{Alert, Incident, Severity, Spike, Summary, SyncState, Threat, TrendPoint};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Data Events (from sentinel-core store subscriptions) ──────
    SummaryUpdated(Arc<Summary>),
    TrendsUpdated(Arc<Vec<TrendPoint>>),
    AlertsUpdated(Arc<Vec<Alert>>),
    ThreatsUpdated(Arc<Vec<Threat>>),
    SpikesUpdated(Arc<Vec<Spike>>),
    MapIncidentsUpdated(Arc<Vec<Arc<Incident>>>),
    IncidentsUpdated(Arc<Vec<Incident>>),
    SchedulerStatusUpdated(bool),
    SyncStateChanged(SyncState),
    RefreshingChanged(bool),
    SeverityFilterChanged(Option<Severity>),
    LastIngestionUpdated(Option<DateTime<Utc>>),
    LastAiRunUpdated(Option<DateTime<Utc>>),

    // ── User Commands ─────────────────────────────────────────────
    RefreshNow,
    FilterSeverity(Option<Severity>),
    RunIngestion,
    RunAi,
    /// Re-enables the operation keys once a POST has settled.
    OperationFinished,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,

    // ── Table Operations ──────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
}
