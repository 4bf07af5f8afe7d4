//! Occupant state engine.
//!
//! The engine owns the slot table and the alert log. Each frame from
//! the upstream pipeline flows through [`RoomEngine::ingest`], which
//! binds tracker identities to slots, classifies posture, runs the
//! fall detectors, and handles slots whose occupant is absent. Query
//! and mutation operations return by-value snapshots or booleans;
//! callers never hold references into engine state.
//!
//! All timing derives from the caller-supplied monotonic `Instant`,
//! which keeps every window testable with a synthetic clock.

pub mod alert_log;
pub mod classifier;
pub mod fall;
pub mod slot;

use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::domain::{Alert, AlertKind, Detection, DetectionFrame};
use alert_log::AlertLog;
use classifier::LyingOutcome;
use slot::Slot;

/// Why a manual registration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    /// The tracker is already bound to a slot
    #[error("tracker {0} is already bound to a slot")]
    AlreadyBound(u64),
    /// No detection in the last ingested frame carries this tracker
    #[error("no detection in the last frame carries tracker {0}")]
    UnknownTracker(u64),
    /// Every slot holds a live occupant
    #[error("all slots are occupied")]
    NoFreeSlot,
}

/// The occupant state engine: slot table, posture classifier, fall
/// detectors and alert log behind one facade.
pub struct RoomEngine {
    config: EngineConfig,
    epoch: Instant,
    slots: Vec<Option<Slot>>,
    alerts: AlertLog,
    last_frame: Vec<Detection>,
    auto_register: bool,
}

impl RoomEngine {
    /// Create an engine whose monotonic epoch is `now`.
    pub fn new(config: EngineConfig, now: Instant) -> Self {
        let slots = (0..config.max_slots).map(|_| None).collect();
        let alerts = AlertLog::new(config.alert_debounce);
        let auto_register = config.auto_register;
        Self {
            config,
            epoch: now,
            slots,
            alerts,
            last_frame: Vec::new(),
            auto_register,
        }
    }

    /// Offset of `now` from the engine epoch; the timestamp unit used
    /// by the alert log and the wire.
    fn offset(&self, now: Instant) -> Duration {
        now.duration_since(self.epoch)
    }

    /// Ingest one detection frame.
    ///
    /// Order per frame: identity binding (including auto-registration
    /// to the lowest free slot), per-matched-slot posture and fall
    /// updates, then absence handling. A slot freed by absence this
    /// frame is not rebound until the next frame.
    pub fn ingest(&mut self, frame: DetectionFrame, now: Instant) {
        self.heal_invariants();

        let mut matched = vec![false; self.slots.len()];

        for det in &frame.detections {
            if det.tracker_id == 0 {
                continue;
            }
            match self.slot_for_tracker(det.tracker_id) {
                Some(idx) => {
                    // a duplicate tracker id in one frame matches once
                    if !matched[idx] {
                        matched[idx] = true;
                        Self::update_slot(
                            &self.config,
                            &mut self.slots,
                            &mut self.alerts,
                            self.epoch,
                            idx,
                            det,
                            now,
                        );
                    }
                }
                None if self.auto_register => {
                    if let Some(idx) = self.free_slot() {
                        self.slots[idx] = Some(Slot::bind(idx, det, now, &self.config));
                        tracing::info!(
                            tracker_id = det.tracker_id,
                            slot_id = idx,
                            "auto-registered occupant"
                        );
                        matched[idx] = true;
                        Self::update_slot(
                            &self.config,
                            &mut self.slots,
                            &mut self.alerts,
                            self.epoch,
                            idx,
                            det,
                            now,
                        );
                    }
                }
                None => {}
            }
        }

        self.handle_absent(&matched, now);
        self.last_frame = frame.detections;
    }

    /// Per-slot update for a matched detection: fall check against the
    /// pre-rotation history, history rotation, posture hysteresis,
    /// lying sub-machine.
    fn update_slot(
        config: &EngineConfig,
        slots: &mut [Option<Slot>],
        alerts: &mut AlertLog,
        epoch: Instant,
        idx: usize,
        det: &Detection,
        now: Instant,
    ) {
        let at = now.duration_since(epoch);
        let Some(slot) = slots[idx].as_mut() else {
            return;
        };

        slot.frame_count += 1;

        if fall::is_sudden_fall(config, slot, det, now) {
            alerts.append(idx, AlertKind::Fall, "Sudden fall detected", at);
        }

        slot.observe(det, now);
        classifier::update_posture(config, slot, det, now);

        match classifier::update_lying(config, slot, det, now) {
            LyingOutcome::BedFall => {
                alerts.append(idx, AlertKind::BedFall, "Bed fall detected", at);
            }
            LyingOutcome::StoodUp => {
                alerts.auto_acknowledge_for(idx);
            }
            LyingOutcome::None => {}
        }
    }

    /// FrameOut and track-loss handling for active slots with no match
    /// this frame.
    fn handle_absent(&mut self, matched: &[bool], now: Instant) {
        let at = self.offset(now);
        for idx in 0..self.slots.len() {
            if matched[idx] {
                continue;
            }
            let Some(slot) = self.slots[idx].as_mut() else {
                continue;
            };

            let absent = now.duration_since(slot.last_seen);
            let tracker_id = slot.tracker_id;

            let raise_frameout =
                absent >= self.config.frameout_alert && !slot.frameout_raised;
            if raise_frameout {
                slot.frameout_raised = true;
            }

            if raise_frameout {
                self.alerts.append(
                    idx,
                    AlertKind::FrameOut,
                    "Left the frame - possible wandering",
                    at,
                );
            }

            if absent >= self.config.track_lost_timeout {
                tracing::info!(
                    slot_id = idx,
                    tracker_id,
                    absent_secs = absent.as_secs(),
                    "tracking stopped after prolonged absence"
                );
                self.slots[idx] = None;
            }
        }
    }

    /// A live slot bound to tracker id 0 is a programming bug; heal by
    /// freeing the slot.
    fn heal_invariants(&mut self) {
        for (idx, entry) in self.slots.iter_mut().enumerate() {
            if entry.as_ref().is_some_and(|s| s.tracker_id == 0) {
                debug_assert!(false, "slot {idx} bound to reserved tracker id 0");
                tracing::warn!(slot_id = idx, "slot bound to reserved tracker id 0; freeing");
                *entry = None;
            }
        }
    }

    fn slot_for_tracker(&self, tracker_id: u64) -> Option<usize> {
        if tracker_id == 0 {
            return None;
        }
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.tracker_id == tracker_id))
    }

    fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Snapshot of the last ingested frame, each detection joined to
    /// its slot id if currently bound.
    pub fn list_detections(&self) -> Vec<(Detection, Option<usize>)> {
        self.last_frame
            .iter()
            .map(|det| (det.clone(), self.slot_for_tracker(det.tracker_id)))
            .collect()
    }

    /// Snapshot of the alert log in insertion order.
    pub fn list_alerts(&self) -> Vec<Alert> {
        self.alerts.snapshot()
    }

    /// Borrow a slot's state (None when the slot is free or out of
    /// range).
    pub fn slot(&self, slot_id: usize) -> Option<&Slot> {
        self.slots.get(slot_id).and_then(Option::as_ref)
    }

    /// Number of live slots.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether unknown trackers are auto-bound to free slots.
    pub fn auto_register(&self) -> bool {
        self.auto_register
    }

    /// The engine's threshold configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Manually bind `tracker_id` to the lowest free slot. Requires a
    /// detection carrying that tracker in the last ingested frame.
    pub fn register(&mut self, tracker_id: u64, now: Instant) -> Result<usize, RegisterError> {
        if tracker_id == 0 {
            return Err(RegisterError::UnknownTracker(tracker_id));
        }
        if self.slot_for_tracker(tracker_id).is_some() {
            return Err(RegisterError::AlreadyBound(tracker_id));
        }
        let det = self
            .last_frame
            .iter()
            .find(|d| d.tracker_id == tracker_id)
            .cloned()
            .ok_or(RegisterError::UnknownTracker(tracker_id))?;
        let idx = self.free_slot().ok_or(RegisterError::NoFreeSlot)?;

        self.slots[idx] = Some(Slot::bind(idx, &det, now, &self.config));
        tracing::info!(tracker_id, slot_id = idx, "manually registered occupant");
        Ok(idx)
    }

    /// Free the slot bound to `tracker_id`. Returns whether a slot was
    /// freed.
    pub fn unregister_by_tracker(&mut self, tracker_id: u64) -> bool {
        match self.slot_for_tracker(tracker_id) {
            Some(idx) => {
                tracing::info!(tracker_id, slot_id = idx, "unregistered occupant");
                self.slots[idx] = None;
                true
            }
            None => false,
        }
    }

    /// Free a slot by id. Returns whether a slot was freed.
    pub fn unregister_slot(&mut self, slot_id: usize) -> bool {
        match self.slots.get_mut(slot_id) {
            Some(entry) if entry.is_some() => {
                tracing::info!(slot_id, "unregistered occupant");
                *entry = None;
                true
            }
            _ => false,
        }
    }

    /// Free every slot. Alerts remain.
    pub fn clear_all(&mut self) {
        for entry in &mut self.slots {
            *entry = None;
        }
        tracing::info!("cleared all registrations");
    }

    /// Acknowledge the alert at `index` (bounds-checked, idempotent).
    pub fn acknowledge_alert(&mut self, index: usize) -> bool {
        self.alerts.acknowledge(index)
    }

    /// Drop all alerts.
    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }

    /// Enable or disable auto-registration.
    pub fn set_auto_register(&mut self, enabled: bool) {
        self.auto_register = enabled;
        tracing::info!(enabled, "auto-register mode changed");
    }
}
