//! Data bridge — connects [`Monitor`] store subscriptions to TUI actions.
//!
//! Runs as a background task: connects the monitor, pushes initial
//! snapshots so screens have data immediately, then loops forwarding
//! every slice change as an [`Action`] through the TUI's action
//! channel. Shuts the monitor down cleanly on cancellation, so no
//! store write can land after the view is gone.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sentinel_core::Monitor;

use crate::action::{Action, Notification};

/// Spawn the data bridge connecting the [`Monitor`] to the TUI.
#[allow(clippy::too_many_lines, clippy::cognitive_complexity)]
pub async fn spawn_data_bridge(
    monitor: Monitor,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    if let Err(e) = monitor.connect().await {
        warn!(error = %e, "failed to connect to backend");
        let _ = action_tx.send(Action::Notify(Notification::error(format!(
            "Connect failed: {e}"
        ))));
        return;
    }

    let store = std::sync::Arc::clone(monitor.store());

    // Subscribe to every slice
    let mut summary = store.subscribe_summary();
    let mut trends = store.subscribe_trends();
    let mut alerts = store.subscribe_alerts();
    let mut threats = store.subscribe_top_threats();
    let mut spikes = store.subscribe_spikes();
    let mut map_incidents = store.subscribe_map_incidents();
    let mut incidents = store.subscribe_incidents();
    let mut severity_filter = store.subscribe_severity_filter();
    let mut scheduler = store.subscribe_scheduler_running();
    let mut sync_state = store.subscribe_sync_state();
    let mut refreshing = store.subscribe_refreshing();
    let mut last_ingestion = store.subscribe_last_ingestion();
    let mut last_ai = store.subscribe_last_ai_run();

    // Push initial snapshots so screens have data immediately
    if let Some(s) = summary.borrow_and_update().clone() {
        let _ = action_tx.send(Action::SummaryUpdated(s));
    }
    let _ = action_tx.send(Action::TrendsUpdated(trends.borrow_and_update().clone()));
    let _ = action_tx.send(Action::AlertsUpdated(alerts.borrow_and_update().clone()));
    let _ = action_tx.send(Action::ThreatsUpdated(threats.borrow_and_update().clone()));
    let _ = action_tx.send(Action::SpikesUpdated(spikes.borrow_and_update().clone()));
    let _ = action_tx.send(Action::MapIncidentsUpdated(
        map_incidents.borrow_and_update().clone(),
    ));
    let _ = action_tx.send(Action::IncidentsUpdated(
        incidents.borrow_and_update().clone(),
    ));
    if let Some(running) = *scheduler.borrow_and_update() {
        let _ = action_tx.send(Action::SchedulerStatusUpdated(running));
    }
    let _ = action_tx.send(Action::SyncStateChanged(*sync_state.borrow_and_update()));

    // Stream loop — forward every change until cancelled
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = summary.changed() => {
                if let Some(s) = summary.borrow_and_update().clone() {
                    let _ = action_tx.send(Action::SummaryUpdated(s));
                }
            }
            Ok(()) = trends.changed() => {
                let _ = action_tx.send(Action::TrendsUpdated(trends.borrow_and_update().clone()));
            }
            Ok(()) = alerts.changed() => {
                let _ = action_tx.send(Action::AlertsUpdated(alerts.borrow_and_update().clone()));
            }
            Ok(()) = threats.changed() => {
                let _ = action_tx.send(Action::ThreatsUpdated(threats.borrow_and_update().clone()));
            }
            Ok(()) = spikes.changed() => {
                let _ = action_tx.send(Action::SpikesUpdated(spikes.borrow_and_update().clone()));
            }
            Ok(()) = map_incidents.changed() => {
                let _ = action_tx.send(Action::MapIncidentsUpdated(
                    map_incidents.borrow_and_update().clone(),
                ));
            }
            Ok(()) = incidents.changed() => {
                let _ = action_tx.send(Action::IncidentsUpdated(
                    incidents.borrow_and_update().clone(),
                ));
            }
            Ok(()) = severity_filter.changed() => {
                let filter = *severity_filter.borrow_and_update();
                let _ = action_tx.send(Action::SeverityFilterChanged(filter));
            }
            Ok(()) = scheduler.changed() => {
                if let Some(running) = *scheduler.borrow_and_update() {
                    let _ = action_tx.send(Action::SchedulerStatusUpdated(running));
                }
            }
            Ok(()) = sync_state.changed() => {
                let _ = action_tx.send(Action::SyncStateChanged(*sync_state.borrow_and_update()));
            }
            Ok(()) = refreshing.changed() => {
                let _ = action_tx.send(Action::RefreshingChanged(*refreshing.borrow_and_update()));
            }
            Ok(()) = last_ingestion.changed() => {
                let ts = *last_ingestion.borrow_and_update();
                let _ = action_tx.send(Action::LastIngestionUpdated(ts));
            }
            Ok(()) = last_ai.changed() => {
                let ts = *last_ai.borrow_and_update();
                let _ = action_tx.send(Action::LastAiRunUpdated(ts));
            }
        }
    }

    monitor.shutdown().await;
    debug!("data bridge shut down");
}
