//! HTTP adapter over the occupant state engine.
//!
//! ## Endpoints
//!
//! - `GET /api/detections` — last frame with slot joins
//! - `GET /api/alerts` — the alert log
//! - `GET /api/config` — engine toggles
//! - `POST /api/register` / `POST /api/unregister` — manual slot
//!   binding by `nvtracker_id`
//! - `POST /api/clear` — free all slots
//! - `POST /api/acknowledge_alert` / `POST /api/clear_alerts`
//! - `POST /api/toggle_auto_register`
//! - `POST /api/ingest` — push a `DetectionFrame` over HTTP

pub mod dto;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub use state::AppState;

/// Build the monitor API router. Responses are CORS-open so tablet
/// UIs on the ward network can call it directly.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/detections", get(handlers::list_detections))
        .route("/api/alerts", get(handlers::list_alerts))
        .route("/api/config", get(handlers::get_config))
        .route("/api/register", post(handlers::register))
        .route("/api/unregister", post(handlers::unregister))
        .route("/api/clear", post(handlers::clear))
        .route("/api/acknowledge_alert", post(handlers::acknowledge_alert))
        .route("/api/clear_alerts", post(handlers::clear_alerts))
        .route(
            "/api/toggle_auto_register",
            post(handlers::toggle_auto_register),
        )
        .route("/api/ingest", post(handlers::ingest_frame))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
