use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/queue", get(handlers::queue::get_board))
        .route("/api/queue/events", get(handlers::queue::events_stream))
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route("/api/bookings/check", post(handlers::bookings::check_conflict))
        .route(
            "/api/bookings/:id",
            get(handlers::bookings::get_booking).put(handlers::bookings::update_booking),
        )
        .route(
            "/api/bookings/:id/status",
            post(handlers::bookings::change_status),
        )
        .route("/api/bookings/:id/move", post(handlers::bookings::move_booking))
        .route(
            "/api/services",
            get(handlers::catalog::list_services).post(handlers::catalog::create_service),
        )
        .route(
            "/api/services/:id",
            axum::routing::put(handlers::catalog::update_service),
        )
        .route(
            "/api/therapists",
            get(handlers::catalog::list_therapists).post(handlers::catalog::create_therapist),
        )
        .route(
            "/api/therapists/:id/status",
            post(handlers::catalog::set_therapist_status),
        )
        .route(
            "/api/config",
            get(handlers::catalog::get_config).put(handlers::catalog::update_config),
        )
        .route("/api/customers", get(handlers::customers::search_customers))
        .route("/api/reports/earnings", get(handlers::reports::earnings))
        .with_state(state)
}
