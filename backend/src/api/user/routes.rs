//! Defines the HTTP routes for user registration and lookup.

use super::handlers::{add_user, get_user, get_user_by_email, get_user_reservations};
use crate::api::AppState;
use axum::{routing::get, Router};

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_user_by_email).post(add_user))
        .route("/:id", get(get_user))
        .route("/:id/reservations", get(get_user_reservations))
}
