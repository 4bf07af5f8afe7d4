//! Wire types for the HTTP adapter.
//!
//! The wire contract predates this implementation (tablet UIs already
//! speak it): tracker identities are `nvtracker_id`, slot identities
//! are `fixed_id` (-1 when unbound), alert kinds are the numeric
//! codes, and timestamps are milliseconds relative to the engine's
//! monotonic epoch.

use serde::{Deserialize, Serialize};

use crate::domain::{Alert, Detection};

/// `GET /api/detections` response.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionsResponse {
    /// Last frame's detections with slot joins
    pub detections: Vec<DetectionDto>,
}

/// One detection joined to its slot binding.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionDto {
    /// Upstream tracker identity
    pub nvtracker_id: u64,
    /// Bound slot id, or -1 when unregistered
    pub fixed_id: i64,
    /// Whether the detection is bound to a slot
    pub registered: bool,
    /// Upstream class id
    pub class_id: i32,
    /// Detection confidence
    pub confidence: f32,
    /// Pixel geometry
    pub bbox: BboxDto,
}

/// Pixel box on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct BboxDto {
    /// Left edge in pixels
    pub left: f32,
    /// Top edge in pixels
    pub top: f32,
    /// Box width in pixels
    pub width: f32,
    /// Box height in pixels
    pub height: f32,
}

impl DetectionDto {
    /// Build the wire row for a detection and its optional slot.
    pub fn from_join(det: &Detection, slot_id: Option<usize>) -> Self {
        Self {
            nvtracker_id: det.tracker_id,
            fixed_id: slot_id.map(|id| id as i64).unwrap_or(-1),
            registered: slot_id.is_some(),
            class_id: det.class_id,
            confidence: det.confidence,
            bbox: BboxDto {
                left: det.bbox.left,
                top: det.bbox.top,
                width: det.bbox.width,
                height: det.bbox.height,
            },
        }
    }
}

/// `GET /api/alerts` response.
#[derive(Debug, Clone, Serialize)]
pub struct AlertsResponse {
    /// Full alert log in insertion order
    pub alerts: Vec<AlertDto>,
}

/// One alert row.
#[derive(Debug, Clone, Serialize)]
pub struct AlertDto {
    /// Stable position in the log
    pub index: usize,
    /// Owning slot
    pub fixed_id: usize,
    /// Numeric kind code (1 Fall, 2 BedFall, 3 BedExit, 4 LyingFloor,
    /// 5 FrameOut)
    #[serde(rename = "type")]
    pub kind: u8,
    /// Human-readable description
    pub message: String,
    /// Milliseconds since the engine's monotonic epoch
    pub timestamp: u64,
    /// Whether the alert has been acknowledged
    pub acknowledged: bool,
}

impl AlertDto {
    /// Build the wire row for an alert at a given log index.
    pub fn from_alert(index: usize, alert: &Alert) -> Self {
        Self {
            index,
            fixed_id: alert.slot_id,
            kind: alert.kind.code(),
            message: alert.message.clone(),
            timestamp: alert.timestamp.as_millis() as u64,
            acknowledged: alert.acknowledged,
        }
    }
}

/// `GET /api/config` response.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    /// Auto-registration flag
    pub auto_register: bool,
}

/// Body of `POST /api/register` and `POST /api/unregister`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerRequest {
    /// Tracker to (un)bind
    pub nvtracker_id: u64,
}

/// Response of `POST /api/register` and `POST /api/unregister`.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerStatusResponse {
    /// "registered" / "unregistered" / "failed"
    pub status: &'static str,
    /// Echo of the requested tracker
    pub nvtracker_id: u64,
}

/// Body of `POST /api/acknowledge_alert`.
#[derive(Debug, Clone, Deserialize)]
pub struct AcknowledgeRequest {
    /// Log index to acknowledge
    pub index: usize,
}

/// Response of `POST /api/acknowledge_alert`.
#[derive(Debug, Clone, Serialize)]
pub struct AcknowledgeResponse {
    /// "acknowledged" / "failed"
    pub status: &'static str,
    /// Echo of the requested index
    pub index: usize,
}

/// Bare status response for clear-style endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Outcome keyword
    pub status: &'static str,
}

/// Response of `POST /api/toggle_auto_register`.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleResponse {
    /// Always "toggled"
    pub status: &'static str,
    /// New flag value
    pub auto_register: bool,
}

/// Response of `POST /api/ingest`.
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    /// Always "ingested"
    pub status: &'static str,
    /// Number of detections in the accepted frame
    pub detections: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlertKind, BoundingBox};
    use std::time::Duration;

    #[test]
    fn test_unbound_detection_row() {
        let det = Detection {
            tracker_id: 42,
            class_id: 0,
            confidence: 0.8,
            bbox: BoundingBox::new(1.0, 2.0, 3.0, 4.0),
        };
        let dto = DetectionDto::from_join(&det, None);
        assert_eq!(dto.fixed_id, -1);
        assert!(!dto.registered);

        let dto = DetectionDto::from_join(&det, Some(2));
        assert_eq!(dto.fixed_id, 2);
        assert!(dto.registered);
    }

    #[test]
    fn test_alert_row_encoding() {
        let alert = Alert::new(1, AlertKind::BedFall, "Bed fall detected", Duration::from_millis(1500));
        let dto = AlertDto::from_alert(3, &alert);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["fixed_id"], 1);
        assert_eq!(json["type"], 2);
        assert_eq!(json["timestamp"], 1500);
        assert_eq!(json["acknowledged"], false);
    }

    #[test]
    fn test_acknowledge_request_parses_index_key() {
        let req: AcknowledgeRequest = serde_json::from_str(r#"{"index":4}"#).unwrap();
        assert_eq!(req.index, 4);
    }
}
