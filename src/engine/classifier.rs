//! Posture classification with temporal hysteresis, plus the lying
//! stability sub-machine that arms bed-fall detection.
//!
//! Per-frame geometry is noisy, so nothing confirms instantly:
//! Standing and Sitting must hold for their configured windows before
//! the slot's posture changes, and the standing/sitting baselines are
//! exponential moving averages rather than raw samples. Lying follows
//! the aspect-ratio test directly but runs its own stability window
//! before a drop in the box can mean falling out of bed.

use std::time::Instant;

use super::slot::Slot;
use crate::config::EngineConfig;
use crate::domain::{Detection, LyingPhase, Posture};

/// What the lying sub-machine observed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyingOutcome {
    /// Nothing notable
    None,
    /// A stable lying occupant dropped sharply below the lying
    /// baseline
    BedFall,
    /// The occupant left the lying posture
    StoodUp,
}

fn ema(current: f32, sample: f32, alpha: f32) -> f32 {
    current * (1.0 - alpha) + sample * alpha
}

/// Update the confirmed posture from this frame's geometry.
///
/// Standing confirms after `stand_confirm` of neither lying nor
/// sitting candidacy and keeps refreshing the standing baselines each
/// confirmed frame. Sitting confirms after `sit_confirm` inside the
/// height band relative to the standing baseline. Any interruption
/// resets the respective candidacy clock.
pub fn update_posture(config: &EngineConfig, slot: &mut Slot, det: &Detection, now: Instant) {
    let ratio = det.bbox.aspect_ratio();
    let lying_candidate = ratio >= config.lying_ratio_enter;
    let sitting_candidate = !lying_candidate
        && slot.stable_height > config.min_box_height
        && {
            let height_ratio = det.bbox.height / slot.stable_height;
            height_ratio >= config.sitting_ratio_min && height_ratio <= config.sitting_ratio_max
        };

    if !lying_candidate && !sitting_candidate {
        if now.duration_since(slot.standing_since) >= config.stand_confirm {
            slot.posture = Posture::Standing;
            slot.was_standing = true;
            slot.stable_height = ema(slot.stable_height, det.bbox.height, config.ema_alpha_stand);
            slot.stable_top = ema(slot.stable_top, det.bbox.top, config.ema_alpha_stand);
        }
    } else {
        slot.standing_since = now;
    }

    if sitting_candidate {
        if now.duration_since(slot.sitting_since) >= config.sit_confirm {
            slot.posture = Posture::Sitting;
            slot.sitting_height = ema(slot.sitting_height, det.bbox.height, config.ema_alpha_sit);
        }
    } else {
        slot.sitting_since = now;
        if !lying_candidate && slot.posture == Posture::Sitting {
            slot.posture = Posture::Unknown;
        }
    }
}

/// Advance the lying sub-machine one frame.
///
/// `NotLying → Candidate` records the entry geometry;
/// `Candidate → Stable` after `lying_stable`, rebasing the reference
/// top edge; while `Stable`, a top-edge drop beyond `bed_fall_drop`
/// reports [`LyingOutcome::BedFall`] and rebases again. Leaving the
/// lying posture from any phase reports [`LyingOutcome::StoodUp`] so
/// the caller can resolve this slot's open alerts.
pub fn update_lying(
    config: &EngineConfig,
    slot: &mut Slot,
    det: &Detection,
    now: Instant,
) -> LyingOutcome {
    let lying_candidate = det.bbox.aspect_ratio() >= config.lying_ratio_enter;

    if lying_candidate {
        slot.posture = Posture::Lying;
        match slot.lying {
            LyingPhase::NotLying => {
                slot.lying = LyingPhase::Candidate {
                    since: now,
                    top: det.bbox.top,
                };
                tracing::debug!(slot_id = slot.slot_id, top = det.bbox.top, "lying down");
                LyingOutcome::None
            }
            LyingPhase::Candidate { since, .. } => {
                if now.duration_since(since) >= config.lying_stable {
                    slot.lying = LyingPhase::Stable {
                        since: now,
                        top: det.bbox.top,
                    };
                }
                LyingOutcome::None
            }
            LyingPhase::Stable { top, .. } => {
                if det.bbox.top - top > config.bed_fall_drop {
                    // rebase so a second drop is measured from the new
                    // resting position
                    slot.lying = LyingPhase::Stable {
                        since: now,
                        top: det.bbox.top,
                    };
                    LyingOutcome::BedFall
                } else {
                    LyingOutcome::None
                }
            }
        }
    } else if slot.lying.is_lying() {
        slot.lying = LyingPhase::NotLying;
        if slot.posture == Posture::Lying {
            slot.posture = Posture::Unknown;
        }
        tracing::debug!(slot_id = slot.slot_id, "standing up from lying");
        LyingOutcome::StoodUp
    } else {
        LyingOutcome::None
    }
}
