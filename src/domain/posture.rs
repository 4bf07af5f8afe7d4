//! Posture states for a tracked occupant.

use std::time::Instant;

/// Confirmed posture of an occupant.
///
/// `Standing` and `Sitting` are only entered after their hysteresis
/// windows elapse; `Lying` follows the per-frame aspect-ratio test
/// directly and carries its own stability sub-machine
/// ([`LyingPhase`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Posture {
    /// Upright, full height
    Standing,
    /// Reduced height relative to the standing baseline
    Sitting,
    /// Box wider than tall
    Lying,
    /// No posture confirmed yet (or a confirmed posture was just left)
    #[default]
    Unknown,
}

impl std::fmt::Display for Posture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Posture::Standing => write!(f, "standing"),
            Posture::Sitting => write!(f, "sitting"),
            Posture::Lying => write!(f, "lying"),
            Posture::Unknown => write!(f, "unknown"),
        }
    }
}

/// Stability sub-machine for the lying posture.
///
/// `NotLying → Candidate` on the first wide-box frame, `Candidate →
/// Stable` once the box has stayed wide long enough, any state →
/// `NotLying` the moment the box narrows again. While `Stable`, the
/// recorded `top` is the reference for bed-fall detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LyingPhase {
    /// Box is upright
    NotLying,
    /// Box went wide; waiting out the stability window
    Candidate {
        /// When the wide box was first seen
        since: Instant,
        /// Top edge at that moment
        top: f32,
    },
    /// Lying long enough to arm bed-fall detection
    Stable {
        /// When stability was (re-)established
        since: Instant,
        /// Reference top edge; a sudden large increase means a drop
        top: f32,
    },
}

impl LyingPhase {
    /// True unless the occupant is upright.
    pub fn is_lying(&self) -> bool {
        !matches!(self, LyingPhase::NotLying)
    }
}
