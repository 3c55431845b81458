// ── Central reactive data store ──
//
// One slice per backend endpoint. A slice is written only by the
// completion of its own fetch, so a failed endpoint leaves its
// previously-displayed data untouched. Mutations are broadcast to
// subscribers via `watch` channels.

mod collection;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use self::collection::IncidentCollection;
use crate::model::{Alert, Incident, Severity, Spike, Summary, Threat, TrendPoint};

/// Sync-loop state as seen by views.
///
/// `Loading` until the first successful summary fetch, `Ready` forever
/// after — the transition is never reversed for the lifetime of the
/// store, even if later polls fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Loading,
    Ready,
}

/// Central reactive store for all dashboard slices.
pub struct DataStore {
    pub(crate) summary: watch::Sender<Option<Arc<Summary>>>,
    pub(crate) trends: watch::Sender<Arc<Vec<TrendPoint>>>,
    pub(crate) alerts: watch::Sender<Arc<Vec<Alert>>>,
    pub(crate) top_threats: watch::Sender<Arc<Vec<Threat>>>,
    pub(crate) spikes: watch::Sender<Arc<Vec<Spike>>>,
    pub(crate) map_incidents: IncidentCollection,
    /// The explorer/feed list — wholesale-replaced, server order.
    pub(crate) incidents: watch::Sender<Arc<Vec<Incident>>>,
    pub(crate) severity_filter: watch::Sender<Option<Severity>>,
    pub(crate) scheduler_running: watch::Sender<Option<bool>>,
    pub(crate) sync_state: watch::Sender<SyncState>,
    /// True while a refresh batch is in flight (drives the spinner).
    pub(crate) refreshing: watch::Sender<bool>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    pub(crate) last_ingestion: watch::Sender<Option<DateTime<Utc>>>,
    pub(crate) last_ai_run: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (summary, _) = watch::channel(None);
        let (trends, _) = watch::channel(Arc::new(Vec::new()));
        let (alerts, _) = watch::channel(Arc::new(Vec::new()));
        let (top_threats, _) = watch::channel(Arc::new(Vec::new()));
        let (spikes, _) = watch::channel(Arc::new(Vec::new()));
        let (incidents, _) = watch::channel(Arc::new(Vec::new()));
        let (severity_filter, _) = watch::channel(None);
        let (scheduler_running, _) = watch::channel(None);
        let (sync_state, _) = watch::channel(SyncState::Loading);
        let (refreshing, _) = watch::channel(false);
        let (last_refresh, _) = watch::channel(None);
        let (last_ingestion, _) = watch::channel(None);
        let (last_ai_run, _) = watch::channel(None);

        Self {
            summary,
            trends,
            alerts,
            top_threats,
            spikes,
            map_incidents: IncidentCollection::new(),
            incidents,
            severity_filter,
            scheduler_running,
            sync_state,
            refreshing,
            last_refresh,
            last_ingestion,
            last_ai_run,
        }
    }

    // ── Slice application (called by the Monitor on fetch success) ───

    pub(crate) fn apply_summary(&self, summary: Summary) {
        self.summary.send_replace(Some(Arc::new(summary)));
        // First successful summary flips Loading → Ready, permanently.
        if *self.sync_state.borrow() == SyncState::Loading {
            let _ = self.sync_state.send(SyncState::Ready);
        }
    }

    pub(crate) fn apply_trends(&self, trends: Vec<TrendPoint>) {
        self.trends.send_replace(Arc::new(trends));
    }

    pub(crate) fn apply_alerts(&self, alerts: Vec<Alert>) {
        self.alerts.send_replace(Arc::new(alerts));
    }

    pub(crate) fn apply_top_threats(&self, threats: Vec<Threat>) {
        self.top_threats.send_replace(Arc::new(threats));
    }

    pub(crate) fn apply_spikes(&self, spikes: Vec<Spike>) {
        self.spikes.send_replace(Arc::new(spikes));
    }

    pub(crate) fn apply_map_incidents(&self, incidents: Vec<Incident>) {
        self.map_incidents.apply(incidents);
    }

    pub(crate) fn apply_incidents(&self, incidents: Vec<Incident>) {
        self.incidents.send_replace(Arc::new(incidents));
    }

    pub(crate) fn apply_scheduler_running(&self, running: bool) {
        self.scheduler_running.send_replace(Some(running));
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn summary_snapshot(&self) -> Option<Arc<Summary>> {
        self.summary.borrow().clone()
    }

    pub fn trends_snapshot(&self) -> Arc<Vec<TrendPoint>> {
        self.trends.borrow().clone()
    }

    pub fn alerts_snapshot(&self) -> Arc<Vec<Alert>> {
        self.alerts.borrow().clone()
    }

    pub fn top_threats_snapshot(&self) -> Arc<Vec<Threat>> {
        self.top_threats.borrow().clone()
    }

    pub fn spikes_snapshot(&self) -> Arc<Vec<Spike>> {
        self.spikes.borrow().clone()
    }

    pub fn map_incidents_snapshot(&self) -> Arc<Vec<Arc<Incident>>> {
        self.map_incidents.snapshot()
    }

    pub fn incidents_snapshot(&self) -> Arc<Vec<Incident>> {
        self.incidents.borrow().clone()
    }

    pub fn severity_filter(&self) -> Option<Severity> {
        *self.severity_filter.borrow()
    }

    pub fn scheduler_running(&self) -> Option<bool> {
        *self.scheduler_running.borrow()
    }

    pub fn sync_state(&self) -> SyncState {
        *self.sync_state.borrow()
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn map_incident_count(&self) -> usize {
        self.map_incidents.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_summary(&self) -> watch::Receiver<Option<Arc<Summary>>> {
        self.summary.subscribe()
    }

    pub fn subscribe_trends(&self) -> watch::Receiver<Arc<Vec<TrendPoint>>> {
        self.trends.subscribe()
    }

    pub fn subscribe_alerts(&self) -> watch::Receiver<Arc<Vec<Alert>>> {
        self.alerts.subscribe()
    }

    pub fn subscribe_top_threats(&self) -> watch::Receiver<Arc<Vec<Threat>>> {
        self.top_threats.subscribe()
    }

    pub fn subscribe_spikes(&self) -> watch::Receiver<Arc<Vec<Spike>>> {
        self.spikes.subscribe()
    }

    pub fn subscribe_map_incidents(&self) -> watch::Receiver<Arc<Vec<Arc<Incident>>>> {
        self.map_incidents.subscribe()
    }

    pub fn subscribe_incidents(&self) -> watch::Receiver<Arc<Vec<Incident>>> {
        self.incidents.subscribe()
    }

    pub fn subscribe_severity_filter(&self) -> watch::Receiver<Option<Severity>> {
        self.severity_filter.subscribe()
    }

    pub fn subscribe_scheduler_running(&self) -> watch::Receiver<Option<bool>> {
        self.scheduler_running.subscribe()
    }

    pub fn subscribe_sync_state(&self) -> watch::Receiver<SyncState> {
        self.sync_state.subscribe()
    }

    pub fn subscribe_refreshing(&self) -> watch::Receiver<bool> {
        self.refreshing.subscribe()
    }

    pub fn subscribe_last_ingestion(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_ingestion.subscribe()
    }

    pub fn subscribe_last_ai_run(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_ai_run.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn last_ingestion(&self) -> Option<DateTime<Utc>> {
        *self.last_ingestion.borrow()
    }

    pub fn last_ai_run(&self) -> Option<DateTime<Utc>> {
        *self.last_ai_run.borrow()
    }

    /// How long ago the last refresh batch settled, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
