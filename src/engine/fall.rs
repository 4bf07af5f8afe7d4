//! Sudden-fall detection from short-horizon geometry deltas.
//!
//! A fall shows up as the bounding box collapsing in height while its
//! top edge moves sharply down the image within a short window. Two
//! threshold pairs cover the fast-total-collapse and
//! partial-collapse signatures; either is sufficient.

use std::time::Instant;

use super::slot::Slot;
use crate::config::EngineConfig;
use crate::domain::Detection;

/// Check whether this frame's geometry, against the slot's history,
/// constitutes a sudden fall.
///
/// Armed only after the warmup frame count, once the occupant has
/// confirmed Standing, and when the reference box is large enough to
/// trust. Tracker jitter is rejected by requiring both a height
/// collapse and a top-edge drop proportional to the reference height.
pub fn is_sudden_fall(
    config: &EngineConfig,
    slot: &Slot,
    det: &Detection,
    now: Instant,
) -> bool {
    if slot.frame_count < config.fall_warmup_frames
        || !slot.was_standing
        || slot.prev_bbox.height <= config.min_box_height
    {
        return false;
    }

    let dt = now.duration_since(slot.last_update);
    if dt.is_zero() || dt > config.fall_window {
        return false;
    }

    let height_ratio = det.bbox.height / slot.prev_bbox.height;
    // positive delta = the head moved down the image
    let top_delta = det.bbox.top - slot.prev_bbox.top;

    let path_a = height_ratio < config.fall_height_drop_a
        && top_delta > config.fall_top_delta_a * slot.prev_bbox.height;
    let path_b = height_ratio < config.fall_height_drop_b
        && top_delta > config.fall_top_delta_b * slot.prev_bbox.height;

    path_a || path_b
}
