//! Defines the HTTP routes for searching and creating properties.

use super::handlers::{add_property, get_property, search_properties};
use crate::api::AppState;
use axum::{routing::get, Router};

pub fn property_router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_properties).post(add_property))
        .route("/:id", get(get_property))
}
