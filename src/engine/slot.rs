//! Per-occupant slot state.

use std::time::Instant;

use crate::config::EngineConfig;
use crate::domain::{BoundingBox, Detection, LyingPhase, Posture};

/// Persistent state for one registered occupant.
///
/// A slot binds a stable `slot_id` (its index in the slot table) to
/// the upstream tracker identity currently carrying this occupant,
/// plus the geometry history the posture and fall detectors consult.
#[derive(Debug, Clone)]
pub struct Slot {
    /// Stable identity, the index into the slot table
    pub slot_id: usize,
    /// Upstream tracker currently bound to this slot (never 0 while
    /// the slot is live)
    pub tracker_id: u64,
    /// Geometry from the most recent matched frame
    pub bbox: BoundingBox,
    /// Geometry from the frame before `last_update`
    pub prev_bbox: BoundingBox,
    /// EMA of box height while Standing is confirmed
    pub stable_height: f32,
    /// EMA of top edge while Standing is confirmed
    pub stable_top: f32,
    /// EMA of box height while Sitting is confirmed
    pub sitting_height: f32,
    /// Lying stability sub-machine
    pub lying: LyingPhase,
    /// Earliest moment of the current standing candidacy
    pub standing_since: Instant,
    /// Earliest moment of the current sitting candidacy
    pub sitting_since: Instant,
    /// Last time any detection matched this slot
    pub last_seen: Instant,
    /// Last time the geometry history was rotated
    pub last_update: Instant,
    /// Matched frames in the current session
    pub frame_count: u32,
    /// Confirmed posture
    pub posture: Posture,
    /// Latched once Standing has ever confirmed this session
    pub was_standing: bool,
    /// Latched once FrameOut fired for the current absence episode
    pub frameout_raised: bool,
}

impl Slot {
    /// Bind a fresh slot to a detection, seeding posture from the
    /// initial aspect ratio.
    pub fn bind(slot_id: usize, det: &Detection, now: Instant, config: &EngineConfig) -> Self {
        let ratio = det.bbox.aspect_ratio();
        let lying_initial = ratio >= config.lying_ratio_initial;

        Self {
            slot_id,
            tracker_id: det.tracker_id,
            bbox: det.bbox,
            prev_bbox: det.bbox,
            stable_height: det.bbox.height,
            stable_top: det.bbox.top,
            sitting_height: 0.0,
            lying: if lying_initial {
                LyingPhase::Candidate {
                    since: now,
                    top: det.bbox.top,
                }
            } else {
                LyingPhase::NotLying
            },
            standing_since: now,
            sitting_since: now,
            last_seen: now,
            last_update: now,
            frame_count: 0,
            posture: if lying_initial {
                Posture::Lying
            } else {
                Posture::Standing
            },
            // wide first box: never seen upright, fall checks stay disarmed
            was_standing: ratio < config.lying_ratio_enter,
            frameout_raised: false,
        }
    }

    /// Record a matched detection: rotate the geometry history and
    /// refresh liveness. Runs after the frame's fall check, which
    /// compares against the pre-rotation history.
    pub fn observe(&mut self, det: &Detection, now: Instant) {
        self.prev_bbox = self.bbox;
        self.bbox = det.bbox;
        self.last_seen = now;
        self.last_update = now;
        self.frameout_raised = false;
    }
}
