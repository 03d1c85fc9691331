pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/admin", get(handlers::admin::admin_page))
        .route(
            "/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/bookings/:id",
            get(handlers::bookings::get_booking).patch(handlers::bookings::update_booking),
        )
        .route(
            "/bookings/:id/notifications",
            get(handlers::bookings::get_notifications),
        )
        .route("/dev/test-email", get(handlers::dev::send_test_email))
        .with_state(state)
}
