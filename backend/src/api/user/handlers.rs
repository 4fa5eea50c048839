//! Handler functions for user profile and management API endpoints.
//!
//! These functions register users, look them up by id or email, and list a
//! guest's reservations. Passwords are stored as given and never returned.

use crate::api::{positive_limit, AppState};
use crate::errors::ApiError;
use crate::utils::empty_as_none;
use adapters::{GuestReservation, NewUser, User};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReservationsResponse {
    pub reservations: Vec<GuestReservation>,
}

#[tracing::instrument(skip(state, user), fields(email = %user.email))]
pub async fn add_user(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if user.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    let user = state.store.add_user(user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    state
        .store
        .get_user_with_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("user"))
}

#[tracing::instrument(skip(state))]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<User>, ApiError> {
    state
        .store
        .get_user_with_email(&query.email)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("user"))
}

#[tracing::instrument(skip(state))]
pub async fn get_user_reservations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ReservationsResponse>, ApiError> {
    let limit = positive_limit(query.limit)?;
    let reservations = state.store.get_all_reservations(id, limit).await?;
    Ok(Json(ReservationsResponse { reservations }))
}
