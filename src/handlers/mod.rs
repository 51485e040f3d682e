pub mod bookings;
pub mod health;
pub mod realtime;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/api/bookings/stats", get(bookings::booking_stats))
        .route("/api/bookings/unread-count", get(bookings::unread_count))
        .route("/api/bookings/mark-read", put(bookings::mark_read))
        .route("/api/bookings/events", get(realtime::events_stream))
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking).delete(bookings::delete_booking),
        )
        .route("/api/bookings/:id/status", put(bookings::update_status))
        .route("/ws", get(realtime::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };

    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(origin, "invalid CORS_ORIGIN, allowing any origin");
            CorsLayer::permissive()
        }
    }
}
