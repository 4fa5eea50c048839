//! Defines the HTTP routes for creating reservations.

use super::handlers::add_reservation;
use crate::api::AppState;
use axum::{routing::post, Router};

pub fn reservation_router() -> Router<AppState> {
    Router::new().route("/", post(add_reservation))
}
