//! Per-frame detection input types.
//!
//! A `DetectionFrame` is the engine's sole input: the upstream
//! video-inference pipeline emits one frame of person detections per
//! tick, each carrying an ephemeral tracker identity and a pixel
//! bounding box.

use serde::{Deserialize, Serialize};

/// Axis-aligned pixel bounding box, top-left origin, Y increasing
/// downward (image coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge in pixels
    pub left: f32,
    /// Top edge in pixels
    pub top: f32,
    /// Box width in pixels
    pub width: f32,
    /// Box height in pixels
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Width-to-height ratio. A ratio well above 1.0 means the box is
    /// wider than tall (a person lying sideways).
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }
}

/// One person detection from the upstream tracker for a single frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Opaque upstream tracker identity. 0 is reserved (never a valid
    /// identity).
    pub tracker_id: u64,
    /// Upstream class identifier (informative; class filtering happens
    /// upstream)
    pub class_id: i32,
    /// Detection confidence in [0, 1] (informative)
    pub confidence: f32,
    /// Pixel geometry
    pub bbox: BoundingBox,
}

/// All detections observed in one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionFrame {
    /// Detections for this frame, in upstream order.
    pub detections: Vec<Detection>,
}

impl DetectionFrame {
    /// Frame with no detections (an empty room).
    pub fn empty() -> Self {
        Self::default()
    }
}
