//! Alert records raised by the occupant state engine.

use std::time::Duration;

/// Kind of safety event an alert reports.
///
/// The numeric codes are the wire encoding (`0` is reserved for
/// "none" and never stored). `BedExit` and `LyingFloor` are part of
/// the taxonomy for wire compatibility but no detector currently
/// emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// Sudden collapse while upright
    Fall,
    /// Drop while lying (out of bed)
    BedFall,
    /// Left the bed (reserved, not emitted)
    BedExit,
    /// Lying on the floor (reserved, not emitted)
    LyingFloor,
    /// Absent from the frame long enough to suggest wandering
    FrameOut,
}

impl AlertKind {
    /// Numeric wire code (0 = none, 1..=5 as below).
    pub fn code(&self) -> u8 {
        match self {
            AlertKind::Fall => 1,
            AlertKind::BedFall => 2,
            AlertKind::BedExit => 3,
            AlertKind::LyingFloor => 4,
            AlertKind::FrameOut => 5,
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::Fall => write!(f, "fall"),
            AlertKind::BedFall => write!(f, "bed_fall"),
            AlertKind::BedExit => write!(f, "bed_exit"),
            AlertKind::LyingFloor => write!(f, "lying_floor"),
            AlertKind::FrameOut => write!(f, "frame_out"),
        }
    }
}

/// One alert raised for a slot.
///
/// Alerts are append-only: once stored their index in the log is
/// stable until the log is cleared. `timestamp` is the offset from
/// the engine's monotonic epoch; only relative ordering is
/// meaningful.
#[derive(Debug, Clone)]
pub struct Alert {
    /// Owning slot
    pub slot_id: usize,
    /// What happened
    pub kind: AlertKind,
    /// Monotonic offset from the engine epoch at detection time
    pub timestamp: Duration,
    /// Short human-readable description
    pub message: String,
    /// Whether an operator (or auto-acknowledge) has seen this
    pub acknowledged: bool,
}

impl Alert {
    /// Create an unacknowledged alert.
    pub fn new(
        slot_id: usize,
        kind: AlertKind,
        message: impl Into<String>,
        timestamp: Duration,
    ) -> Self {
        Self {
            slot_id,
            kind,
            timestamp,
            message: message.into(),
            acknowledged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(AlertKind::Fall.code(), 1);
        assert_eq!(AlertKind::BedFall.code(), 2);
        assert_eq!(AlertKind::BedExit.code(), 3);
        assert_eq!(AlertKind::LyingFloor.code(), 4);
        assert_eq!(AlertKind::FrameOut.code(), 5);
    }

    #[test]
    fn test_new_alert_is_unacknowledged() {
        let alert = Alert::new(0, AlertKind::Fall, "Sudden fall detected", Duration::from_secs(5));
        assert!(!alert.acknowledged);
        assert_eq!(alert.slot_id, 0);
    }
}
