//! Append-only alert log with debounce and per-slot auto-acknowledge.

use std::time::Duration;

use crate::domain::{Alert, AlertKind};

/// Ordered log of raised alerts.
///
/// Indices are stable: an alert keeps its position until the log is
/// cleared. Appends are debounced so a persisting condition produces
/// one alert per window instead of one per frame.
#[derive(Debug)]
pub struct AlertLog {
    entries: Vec<Alert>,
    debounce: Duration,
}

impl AlertLog {
    /// Create an empty log with the given debounce window.
    pub fn new(debounce: Duration) -> Self {
        Self {
            entries: Vec::new(),
            debounce,
        }
    }

    /// Append an alert unless an unacknowledged alert of the same
    /// `(slot_id, kind)` already exists within the debounce window.
    /// Returns whether the alert was stored.
    pub fn append(
        &mut self,
        slot_id: usize,
        kind: AlertKind,
        message: &str,
        at: Duration,
    ) -> bool {
        let suppressed = self.entries.iter().any(|a| {
            a.slot_id == slot_id
                && a.kind == kind
                && !a.acknowledged
                && at.saturating_sub(a.timestamp) < self.debounce
        });
        if suppressed {
            return false;
        }

        tracing::info!(slot_id, kind = %kind, message, "alert raised");
        self.entries.push(Alert::new(slot_id, kind, message, at));
        true
    }

    /// Mark the alert at `index` acknowledged. Returns false when the
    /// index is out of range; acknowledging twice is a no-op.
    pub fn acknowledge(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Acknowledge every open alert owned by `slot_id` (the occupant
    /// stood back up, the episode is resolved). Returns how many were
    /// marked.
    pub fn auto_acknowledge_for(&mut self, slot_id: usize) -> usize {
        let mut marked = 0;
        for alert in self
            .entries
            .iter_mut()
            .filter(|a| a.slot_id == slot_id && !a.acknowledged)
        {
            alert.acknowledged = true;
            marked += 1;
        }
        if marked > 0 {
            tracing::info!(slot_id, marked, "auto-acknowledged open alerts");
        }
        marked
    }

    /// Drop all alerts (indices restart from zero).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// By-value copy of the log in insertion order.
    pub fn snapshot(&self) -> Vec<Alert> {
        self.entries.clone()
    }

    /// Number of stored alerts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no alerts are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> AlertLog {
        AlertLog::new(Duration::from_secs(30))
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_debounce_suppresses_repeats() {
        let mut log = log();
        assert!(log.append(0, AlertKind::Fall, "Sudden fall detected", secs(0)));

        // the condition persists every second for half a minute
        for t in 1..30 {
            assert!(!log.append(0, AlertKind::Fall, "Sudden fall detected", secs(t)));
        }
        assert_eq!(log.len(), 1);

        // past the window a fresh alert may be raised
        assert!(log.append(0, AlertKind::Fall, "Sudden fall detected", secs(31)));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_debounce_is_per_slot_and_kind() {
        let mut log = log();
        assert!(log.append(0, AlertKind::Fall, "Sudden fall detected", secs(0)));
        assert!(log.append(1, AlertKind::Fall, "Sudden fall detected", secs(1)));
        assert!(log.append(0, AlertKind::FrameOut, "Left the frame", secs(1)));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_acknowledged_alerts_do_not_debounce() {
        let mut log = log();
        log.append(0, AlertKind::Fall, "Sudden fall detected", secs(0));
        assert!(log.acknowledge(0));

        assert!(log.append(0, AlertKind::Fall, "Sudden fall detected", secs(5)));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_acknowledge_is_bounds_checked_and_idempotent() {
        let mut log = log();
        log.append(0, AlertKind::Fall, "Sudden fall detected", secs(0));

        assert!(log.acknowledge(0));
        assert!(log.acknowledge(0));
        assert!(!log.acknowledge(1));
    }

    #[test]
    fn test_auto_acknowledge_marks_only_owned() {
        let mut log = log();
        log.append(0, AlertKind::Fall, "Sudden fall detected", secs(0));
        log.append(1, AlertKind::FrameOut, "Left the frame", secs(1));
        log.append(0, AlertKind::BedFall, "Bed fall detected", secs(2));

        assert_eq!(log.auto_acknowledge_for(0), 2);
        let alerts = log.snapshot();
        assert!(alerts[0].acknowledged);
        assert!(!alerts[1].acknowledged);
        assert!(alerts[2].acknowledged);

        // nothing left to mark
        assert_eq!(log.auto_acknowledge_for(0), 0);
    }

    #[test]
    fn test_indices_are_stable() {
        let mut log = log();
        log.append(0, AlertKind::Fall, "Sudden fall detected", secs(0));
        log.append(1, AlertKind::FrameOut, "Left the frame", secs(1));

        log.acknowledge(0);
        let alerts = log.snapshot();
        assert_eq!(alerts[0].kind, AlertKind::Fall);
        assert_eq!(alerts[1].kind, AlertKind::FrameOut);

        log.clear();
        assert!(log.is_empty());
    }
}
