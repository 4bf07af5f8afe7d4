//! Axum request handlers for the monitor API.
//!
//! Rejected inputs (unknown tracker, occupied table, out-of-range
//! alert index) are reported as a `"failed"` status in an otherwise
//! normal response; they are expected operator actions, not server
//! errors.

use axum::{extract::State, Json};

use super::dto::*;
use super::state::AppState;
use crate::domain::DetectionFrame;

/// `GET /api/detections` — last frame joined to slot bindings.
#[tracing::instrument(skip(state))]
pub async fn list_detections(State(state): State<AppState>) -> Json<DetectionsResponse> {
    let detections = state
        .list_detections()
        .iter()
        .map(|(det, slot_id)| DetectionDto::from_join(det, *slot_id))
        .collect();
    Json(DetectionsResponse { detections })
}

/// `GET /api/alerts` — the full alert log.
#[tracing::instrument(skip(state))]
pub async fn list_alerts(State(state): State<AppState>) -> Json<AlertsResponse> {
    let alerts = state
        .list_alerts()
        .iter()
        .enumerate()
        .map(|(index, alert)| AlertDto::from_alert(index, alert))
        .collect();
    Json(AlertsResponse { alerts })
}

/// `GET /api/config` — current engine toggles.
#[tracing::instrument(skip(state))]
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        auto_register: state.auto_register(),
    })
}

/// `POST /api/register` — manually bind a visible tracker.
#[tracing::instrument(skip(state))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<TrackerRequest>,
) -> Json<TrackerStatusResponse> {
    let status = match state.register(request.nvtracker_id) {
        Ok(_) => "registered",
        Err(err) => {
            tracing::debug!(tracker_id = request.nvtracker_id, %err, "registration refused");
            "failed"
        }
    };
    Json(TrackerStatusResponse {
        status,
        nvtracker_id: request.nvtracker_id,
    })
}

/// `POST /api/unregister` — unbind a tracker's slot.
#[tracing::instrument(skip(state))]
pub async fn unregister(
    State(state): State<AppState>,
    Json(request): Json<TrackerRequest>,
) -> Json<TrackerStatusResponse> {
    let status = if state.unregister_by_tracker(request.nvtracker_id) {
        "unregistered"
    } else {
        "failed"
    };
    Json(TrackerStatusResponse {
        status,
        nvtracker_id: request.nvtracker_id,
    })
}

/// `POST /api/clear` — free every slot.
#[tracing::instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<StatusResponse> {
    state.clear_all();
    Json(StatusResponse { status: "cleared" })
}

/// `POST /api/acknowledge_alert` — mark one alert as seen.
#[tracing::instrument(skip(state))]
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Json(request): Json<AcknowledgeRequest>,
) -> Json<AcknowledgeResponse> {
    let status = if state.acknowledge_alert(request.index) {
        "acknowledged"
    } else {
        "failed"
    };
    Json(AcknowledgeResponse {
        status,
        index: request.index,
    })
}

/// `POST /api/clear_alerts` — drop the alert log.
#[tracing::instrument(skip(state))]
pub async fn clear_alerts(State(state): State<AppState>) -> Json<StatusResponse> {
    state.clear_alerts();
    Json(StatusResponse {
        status: "alerts_cleared",
    })
}

/// `POST /api/toggle_auto_register` — flip auto-registration.
#[tracing::instrument(skip(state))]
pub async fn toggle_auto_register(State(state): State<AppState>) -> Json<ToggleResponse> {
    let auto_register = state.toggle_auto_register();
    Json(ToggleResponse {
        status: "toggled",
        auto_register,
    })
}

/// `POST /api/ingest` — push one detection frame over HTTP instead of
/// the UDP feed.
#[tracing::instrument(skip(state, frame))]
pub async fn ingest_frame(
    State(state): State<AppState>,
    Json(frame): Json<DetectionFrame>,
) -> Json<IngestResponse> {
    let detections = frame.detections.len();
    state.ingest(frame);
    Json(IngestResponse {
        status: "ingested",
        detections,
    })
}
