// ── Reactive incident collection ──
//
// Lock-free concurrent storage keyed by incident id, with push-based
// change notification via a `watch` channel.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::Incident;

/// A keyed, reactive collection of incidents.
///
/// Uses `DashMap` for O(1) concurrent lookups and a `watch` channel
/// for push-based change notification. Applying a poll result is
/// upsert-then-prune: incoming records are upserted first, then ids
/// absent from the incoming set are removed. This avoids the brief
/// empty frame that clear-then-insert would flash on every poll.
pub(crate) struct IncidentCollection {
    by_id: DashMap<i64, Arc<Incident>>,

    /// Full snapshot, rebuilt on mutation, ordered by risk descending.
    snapshot: watch::Sender<Arc<Vec<Arc<Incident>>>>,
}

impl IncidentCollection {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_id: DashMap::new(),
            snapshot,
        }
    }

    /// Apply one poll result wholesale (upsert-then-prune).
    pub(crate) fn apply(&self, incoming: Vec<Incident>) {
        let incoming_ids: HashSet<i64> = incoming.iter().map(|i| i.id).collect();

        for incident in incoming {
            self.by_id.insert(incident.id, Arc::new(incident));
        }
        let stale: Vec<i64> = self
            .by_id
            .iter()
            .map(|r| *r.key())
            .filter(|id| !incoming_ids.contains(id))
            .collect();
        for id in stale {
            self.by_id.remove(&id);
        }

        self.rebuild_snapshot();
    }

    /// Look up an incident by id.
    #[allow(dead_code)]
    pub(crate) fn get(&self, id: i64) -> Option<Arc<Incident>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<Incident>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Incident>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all values into a snapshot vec and broadcast to
    /// subscribers, highest risk first (map labels draw in that order).
    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<Incident>> =
            self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        values.sort_by(|a, b| {
            let ra = a.risk_score.unwrap_or(0.0);
            let rb = b.risk_score.unwrap_or(0.0);
            rb.partial_cmp(&ra)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn incident(id: i64, risk: f64) -> Incident {
        Incident {
            id,
            incident_type: Some("ddos".into()),
            severity: None,
            risk_score: Some(risk),
            latitude: None,
            longitude: None,
            cluster_id: None,
            source: None,
            content: None,
            collected_at: None,
        }
    }

    #[test]
    fn apply_upserts_and_prunes() {
        let col = IncidentCollection::new();
        col.apply(vec![incident(1, 0.1), incident(2, 0.2)]);
        assert_eq!(col.len(), 2);

        // 2 survives, 1 is pruned, 3 is new
        col.apply(vec![incident(2, 0.3), incident(3, 0.4)]);
        assert_eq!(col.len(), 2);
        assert!(col.get(1).is_none());
        assert_eq!(col.get(2).unwrap().risk_score, Some(0.3));
    }

    #[test]
    fn snapshot_is_risk_ordered() {
        let col = IncidentCollection::new();
        col.apply(vec![incident(1, 0.2), incident(2, 0.9), incident(3, 0.5)]);

        let snap = col.snapshot();
        let ids: Vec<i64> = snap.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn subscribers_see_applied_changes() {
        let col = IncidentCollection::new();
        let rx = col.subscribe();
        assert!(rx.borrow().is_empty());

        col.apply(vec![incident(7, 0.7)]);
        assert_eq!(rx.borrow().len(), 1);
    }
}
