//! Engine configuration.
//!
//! Every timing window and geometry threshold the engine consults
//! lives here, so tests and deployments can tune them without
//! touching detector code.

use std::time::Duration;

/// Thresholds and windows for the occupant state engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of registration slots (default: 4)
    pub max_slots: usize,
    /// Auto-bind unknown trackers to free slots (default: true)
    pub auto_register: bool,

    /// Width/height ratio at or above which a box counts as lying
    /// (default: 1.2)
    pub lying_ratio_enter: f32,
    /// Width/height ratio on first sight that seeds the slot already
    /// lying (default: 1.8)
    pub lying_ratio_initial: f32,
    /// Band of `height / stable_height` that counts as sitting
    /// (default: 0.55..=0.85)
    pub sitting_ratio_min: f32,
    /// Upper bound of the sitting band
    pub sitting_ratio_max: f32,
    /// Upright/sitting must hold this long before confirming
    /// (defaults: 3 s / 2 s)
    pub stand_confirm: Duration,
    /// Hysteresis window for confirming Sitting
    pub sit_confirm: Duration,
    /// Lying must hold this long before bed-fall detection arms
    /// (default: 3 s)
    pub lying_stable: Duration,

    /// Height-ratio upper bound for fall path A (default: 0.7)
    pub fall_height_drop_a: f32,
    /// Top-edge drop for path A, as a fraction of the previous height
    /// (default: 0.30)
    pub fall_top_delta_a: f32,
    /// Height-ratio upper bound for fall path B (default: 0.5)
    pub fall_height_drop_b: f32,
    /// Top-edge drop for path B, as a fraction of the previous height
    /// (default: 0.15)
    pub fall_top_delta_b: f32,
    /// Maximum interval between the frames a fall compares
    /// (default: 2000 ms)
    pub fall_window: Duration,
    /// Frames a slot must be tracked before fall checks run
    /// (default: 10)
    pub fall_warmup_frames: u32,
    /// Minimum plausible box height in pixels; smaller boxes are too
    /// noisy for fall or sitting-ratio checks (default: 100)
    pub min_box_height: f32,
    /// Top-edge drop from the lying baseline that counts as falling
    /// out of bed (default: 150 px)
    pub bed_fall_drop: f32,

    /// Absence duration that raises FrameOut (default: 10 s)
    pub frameout_alert: Duration,
    /// Absence duration after which the slot is freed (default: 60 s)
    pub track_lost_timeout: Duration,
    /// Suppression window for identical (slot, kind) alerts
    /// (default: 30 s)
    pub alert_debounce: Duration,

    /// EMA weight of a new sample while Standing is confirmed
    /// (default: 0.2)
    pub ema_alpha_stand: f32,
    /// EMA weight of a new sample while Sitting is confirmed
    /// (default: 0.3)
    pub ema_alpha_sit: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_slots: 4,
            auto_register: true,
            lying_ratio_enter: 1.2,
            lying_ratio_initial: 1.8,
            sitting_ratio_min: 0.55,
            sitting_ratio_max: 0.85,
            stand_confirm: Duration::from_secs(3),
            sit_confirm: Duration::from_secs(2),
            lying_stable: Duration::from_secs(3),
            fall_height_drop_a: 0.7,
            fall_top_delta_a: 0.30,
            fall_height_drop_b: 0.5,
            fall_top_delta_b: 0.15,
            fall_window: Duration::from_millis(2000),
            fall_warmup_frames: 10,
            min_box_height: 100.0,
            bed_fall_drop: 150.0,
            frameout_alert: Duration::from_secs(10),
            track_lost_timeout: Duration::from_secs(60),
            alert_debounce: Duration::from_secs(30),
            ema_alpha_stand: 0.2,
            ema_alpha_sit: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.max_slots, 4);
        assert!(config.auto_register);
        assert!((config.lying_ratio_enter - 1.2).abs() < f32::EPSILON);
        assert!((config.lying_ratio_initial - 1.8).abs() < f32::EPSILON);
        assert_eq!(config.frameout_alert, Duration::from_secs(10));
        assert_eq!(config.track_lost_timeout, Duration::from_secs(60));
        assert_eq!(config.alert_debounce, Duration::from_secs(30));
    }
}
