//! Shared application state for the HTTP adapter.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::domain::{Alert, Detection, DetectionFrame};
use crate::engine::{RegisterError, RoomEngine};

/// Handle to the engine, cloned into each request handler.
///
/// One exclusive lock guards the engine: the ingest task holds it for
/// the duration of one frame update; query handlers hold it briefly
/// for a by-value snapshot or a small mutation. Nothing awaits while
/// holding the lock.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<RoomEngine>>,
}

impl AppState {
    /// Create state around a fresh engine whose monotonic epoch is
    /// now.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_engine(RoomEngine::new(config, Instant::now()))
    }

    /// Wrap an existing engine (used by tests that drive a synthetic
    /// clock before handing the engine to the API).
    pub fn with_engine(engine: RoomEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Feed one detection frame into the engine.
    pub fn ingest(&self, frame: DetectionFrame) {
        self.engine.lock().ingest(frame, Instant::now());
    }

    /// Last frame's detections joined to their slot bindings.
    pub fn list_detections(&self) -> Vec<(Detection, Option<usize>)> {
        self.engine.lock().list_detections()
    }

    /// Alert log snapshot.
    pub fn list_alerts(&self) -> Vec<Alert> {
        self.engine.lock().list_alerts()
    }

    /// Manual registration of a tracker visible in the last frame.
    pub fn register(&self, tracker_id: u64) -> Result<usize, RegisterError> {
        self.engine.lock().register(tracker_id, Instant::now())
    }

    /// Unbind the slot carrying `tracker_id`.
    pub fn unregister_by_tracker(&self, tracker_id: u64) -> bool {
        self.engine.lock().unregister_by_tracker(tracker_id)
    }

    /// Free every slot.
    pub fn clear_all(&self) {
        self.engine.lock().clear_all();
    }

    /// Acknowledge one alert by log index.
    pub fn acknowledge_alert(&self, index: usize) -> bool {
        self.engine.lock().acknowledge_alert(index)
    }

    /// Drop all alerts.
    pub fn clear_alerts(&self) {
        self.engine.lock().clear_alerts();
    }

    /// Flip auto-registration and return the new value.
    pub fn toggle_auto_register(&self) -> bool {
        let mut engine = self.engine.lock();
        let enabled = !engine.auto_register();
        engine.set_auto_register(enabled);
        enabled
    }

    /// Current auto-registration flag.
    pub fn auto_register(&self) -> bool {
        self.engine.lock().auto_register()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoundingBox, Detection};

    fn frame_with(tracker_id: u64) -> DetectionFrame {
        DetectionFrame {
            detections: vec![Detection {
                tracker_id,
                class_id: 0,
                confidence: 0.9,
                bbox: BoundingBox::new(100.0, 100.0, 60.0, 200.0),
            }],
        }
    }

    #[test]
    fn test_ingest_and_snapshot() {
        let state = AppState::new(EngineConfig::default());
        state.ingest(frame_with(7));

        let detections = state.list_detections();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].1, Some(0));
    }

    #[test]
    fn test_toggle_roundtrip() {
        let state = AppState::new(EngineConfig::default());
        assert!(state.auto_register());
        assert!(!state.toggle_auto_register());
        assert!(state.toggle_auto_register());
    }

    #[test]
    fn test_register_through_state() {
        let config = EngineConfig {
            auto_register: false,
            ..Default::default()
        };
        let state = AppState::new(config);
        state.ingest(frame_with(9));

        assert!(state.register(9).is_ok());
        assert_eq!(state.register(9), Err(RegisterError::AlreadyBound(9)));
        assert!(state.unregister_by_tracker(9));
    }
}
