pub mod booking;
pub mod catalog;
pub mod health;
pub mod preferences;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/offerings", get(catalog::list_offerings))
        .route("/api/slots", get(catalog::get_slots))
        .route("/api/bookings", post(booking::open_booking))
        .route("/api/bookings/events", get(booking::events_stream))
        .route("/api/bookings/:id", get(booking::get_booking))
        .route("/api/bookings/:id/info", put(booking::update_info))
        .route("/api/bookings/:id/info/submit", post(booking::submit_info))
        .route("/api/bookings/:id/payment", post(booking::submit_payment))
        .route("/api/bookings/:id/back", post(booking::back_to_info))
        .route("/api/bookings/:id/close", post(booking::close_booking))
        .route(
            "/api/preferences/:key",
            get(preferences::get_preference)
                .put(preferences::set_preference)
                .delete(preferences::delete_preference),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
