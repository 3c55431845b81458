// ── Monitor: the dashboard sync loop ──
//
// Owns all remote-state fetching: the initial batch, the periodic
// refresh timer, manual refresh triggers, severity-scoped list
// fetches, and the two fire-and-forget operation commands. Fetched
// data lands in the DataStore; views subscribe there.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sentinel_api::{ShieldClient, TlsMode, TransportConfig};

use crate::config::{MonitorConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{Alert, Incident, Severity, Spike, Threat, TrendPoint};
use crate::store::DataStore;

// ── Monitor ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. Manages the polling
/// lifecycle: connect, periodic refresh, command relay, teardown.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    store: Arc<DataStore>,
    client: Mutex<Option<ShieldClient>>,
    /// Re-entrancy guard: a refresh started while another batch is in
    /// flight returns immediately (the in-flight batch is the refresh).
    refresh_in_flight: AtomicBool,
    cancel: CancellationToken,
    /// Child token for the current connection — cancelled on shutdown,
    /// replaced on reconnect (avoids permanent cancellation).
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Monitor {
    /// Create a new Monitor from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to start the sync loop.
    pub fn new(config: MonitorConfig) -> Self {
        let store = Arc::new(DataStore::new());
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(MonitorInner {
                config,
                store,
                client: Mutex::new(None),
                refresh_in_flight: AtomicBool::new(false),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Connect to the backend: build the HTTP client, run the initial
    /// fetch batch, and spawn the periodic refresh task.
    ///
    /// Endpoint failures during the initial batch are non-fatal — the
    /// dashboard stays in `Loading` until a summary lands and every
    /// scheduled poll is the retry. Only client construction (bad URL,
    /// broken TLS setup) errors out.
    pub async fn connect(&self) -> Result<(), CoreError> {
        // Fresh child token for this connection (supports reconnect).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        let config = &self.inner.config;
        let transport = build_transport(config);
        let client = ShieldClient::new(config.url.as_str(), &transport)?;
        *self.inner.client.lock().await = Some(client);

        // Initial data load — all-settle, per-endpoint tolerance.
        self.refresh().await;

        let interval_secs = config.refresh_interval_secs;
        if interval_secs > 0 {
            let monitor = self.clone();
            let cancel = child.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(refresh_task(monitor, interval_secs, cancel)));
        }

        info!(url = %config.url, "monitor connected");
        Ok(())
    }

    /// Tear down the sync loop.
    ///
    /// Cancels the refresh timer and joins all background tasks — no
    /// state writes occur after this returns, so a request started just
    /// before teardown can never touch a torn-down view.
    pub async fn shutdown(&self) {
        // Cancel the child token (not the parent — allows reconnect).
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        *self.inner.client.lock().await = None;
        debug!("monitor shut down");
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Run one full fetch batch against all eight endpoints.
    ///
    /// Idempotent and safe to call while a previous refresh is still in
    /// flight: an overlapping call is dropped (the in-flight batch IS
    /// the refresh). All requests are issued concurrently and the batch
    /// waits for all to settle — each success is applied to its own
    /// store slice, each failure is logged and leaves that slice
    /// untouched. There is no retry; the next poll is the retry.
    #[allow(clippy::cognitive_complexity)]
    pub async fn refresh(&self) {
        if self.inner.refresh_in_flight.swap(true, Ordering::SeqCst) {
            debug!("refresh already in flight — skipping");
            return;
        }

        let client = self.inner.client.lock().await.clone();
        let Some(client) = client else {
            self.inner.refresh_in_flight.store(false, Ordering::SeqCst);
            debug!("refresh requested before connect — ignored");
            return;
        };

        self.inner.store.refreshing.send_replace(true);

        let config = &self.inner.config;
        let severity = self.inner.store.severity_filter();

        let (
            summary_res,
            trends_res,
            alerts_res,
            threats_res,
            spikes_res,
            map_res,
            incidents_res,
            status_res,
        ) = tokio::join!(
            client.get_summary(),
            client.get_trends(),
            client.get_alerts(Some(config.alert_limit)),
            client.get_top_threats(Some(config.threat_limit)),
            client.get_spikes(),
            client.get_map_incidents(),
            client.list_incidents(Some(config.incident_limit), severity.map(Severity::as_str)),
            client.get_scheduler_status(),
        );

        let store = &self.inner.store;
        let mut succeeded = 0usize;

        match summary_res {
            Ok(raw) => {
                store.apply_summary(raw.into());
                succeeded += 1;
            }
            Err(e) => warn!(error = %e, "summary fetch failed"),
        }

        match trends_res {
            Ok(raw) => {
                let trends: Vec<TrendPoint> =
                    raw.hourly_trends.into_iter().map(Into::into).collect();
                store.apply_trends(trends);
                succeeded += 1;
            }
            Err(e) => warn!(error = %e, "trends fetch failed"),
        }

        match alerts_res {
            Ok(raw) => {
                let alerts: Vec<Alert> = raw.alerts.into_iter().map(Into::into).collect();
                store.apply_alerts(alerts);
                succeeded += 1;
            }
            Err(e) => warn!(error = %e, "alerts fetch failed"),
        }

        match threats_res {
            Ok(raw) => {
                let threats: Vec<Threat> = raw.top_threats.into_iter().map(Into::into).collect();
                store.apply_top_threats(threats);
                succeeded += 1;
            }
            Err(e) => warn!(error = %e, "top-threats fetch failed"),
        }

        match spikes_res {
            Ok(raw) => {
                let spikes: Vec<Spike> = raw.spikes.into_iter().map(Into::into).collect();
                store.apply_spikes(spikes);
                succeeded += 1;
            }
            Err(e) => warn!(error = %e, "spikes fetch failed"),
        }

        match map_res {
            Ok(raw) => {
                let incidents: Vec<Incident> = raw.incidents.into_iter().map(Into::into).collect();
                store.apply_map_incidents(incidents);
                succeeded += 1;
            }
            Err(e) => warn!(error = %e, "map fetch failed"),
        }

        match incidents_res {
            Ok(raw) => {
                let incidents: Vec<Incident> = raw.into_iter().map(Into::into).collect();
                store.apply_incidents(incidents);
                succeeded += 1;
            }
            Err(e) => warn!(error = %e, "incident list fetch failed"),
        }

        match status_res {
            Ok(raw) => {
                store.apply_scheduler_running(raw.running);
                succeeded += 1;
            }
            Err(e) => warn!(error = %e, "scheduler status fetch failed"),
        }

        if succeeded > 0 {
            store.last_refresh.send_replace(Some(Utc::now()));
        }
        store.refreshing.send_replace(false);
        self.inner.refresh_in_flight.store(false, Ordering::SeqCst);

        debug!(succeeded, total = 8, "refresh batch settled");
    }

    // ── Filtering ────────────────────────────────────────────────────

    /// Set the severity filter and fetch the incident list scoped to
    /// it (`None` clears the filter). The filter is recorded first so
    /// subsequent polls stay scoped even if this fetch fails; a failed
    /// fetch keeps the previously-displayed list.
    pub async fn filter_by_severity(&self, severity: Option<Severity>) {
        self.inner.store.severity_filter.send_replace(severity);

        let client = self.inner.client.lock().await.clone();
        let Some(client) = client else {
            return;
        };

        let limit = Some(self.inner.config.incident_limit);
        match client
            .list_incidents(limit, severity.map(Severity::as_str))
            .await
        {
            Ok(raw) => {
                let incidents: Vec<Incident> = raw.into_iter().map(Into::into).collect();
                self.inner.store.apply_incidents(incidents);
            }
            Err(e) => warn!(error = %e, ?severity, "filtered incident fetch failed"),
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Trigger an ingestion job, record the local run timestamp once
    /// the POST resolves, then refresh to pick up resulting state.
    pub async fn run_ingestion(&self) -> Result<(), CoreError> {
        let client = self.client().await?;
        client.run_ingestion().await?;
        self.inner.store.last_ingestion.send_replace(Some(Utc::now()));
        info!("ingestion triggered");
        self.refresh().await;
        Ok(())
    }

    /// Trigger an AI analysis job. Same shape as
    /// [`run_ingestion`](Self::run_ingestion).
    pub async fn run_ai(&self) -> Result<(), CoreError> {
        let client = self.client().await?;
        client.run_ai().await?;
        self.inner.store.last_ai_run.send_replace(Some(Utc::now()));
        info!("AI analysis triggered");
        self.refresh().await;
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn client(&self) -> Result<ShieldClient, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::NotConnected)
    }
}

// ── Transport construction ───────────────────────────────────────────

fn build_transport(config: &MonitorConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };

    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodic refresh driver. Shares the exact code path with manual
/// refresh; the timer is cancelled through the child token on shutdown.
async fn refresh_task(monitor: Monitor, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                monitor.refresh().await;
            }
        }
    }
}
