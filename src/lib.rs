//! # Room Sentinel
//!
//! An edge room monitor for care settings. It consumes per-frame
//! person detections from an upstream video-inference pipeline and
//! derives behavioural state for a small fixed number of occupants:
//! stable identities over churning tracker ids, a posture state
//! machine with temporal hysteresis, and safety alerts (sudden falls,
//! bed falls, prolonged absence) with debouncing and
//! auto-resolution.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   DetectionFrame   ┌─────────────────────────┐
//! │ video infer  │ ──UDP/HTTP──────▶  │       RoomEngine        │
//! │  pipeline    │                    │ slots · posture · falls │
//! └──────────────┘                    │       alert log         │
//!                                     └───────────┬─────────────┘
//!                        snapshots / mutations    │ one lock
//!                                     ┌───────────▼─────────────┐
//!                                     │     axum HTTP API       │
//!                                     └─────────────────────────┘
//! ```
//!
//! The engine is synchronous and clock-agnostic: every operation that
//! involves time takes a monotonic `Instant`, so all hysteresis
//! windows are exercised in tests with a synthetic clock.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Instant;
//! use room_sentinel::{DetectionFrame, EngineConfig, RoomEngine};
//!
//! let now = Instant::now();
//! let mut engine = RoomEngine::new(EngineConfig::default(), now);
//! engine.ingest(DetectionFrame::empty(), now);
//! assert!(engine.list_alerts().is_empty());
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod ingest;

pub use api::{create_router, AppState};
pub use config::EngineConfig;
pub use domain::{
    Alert, AlertKind, BoundingBox, Detection, DetectionFrame, LyingPhase, Posture,
};
pub use engine::{RegisterError, RoomEngine};
pub use ingest::{FrameReceiver, IngestConfig};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
