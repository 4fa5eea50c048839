//! Handler functions for the reservation API.

use crate::api::AppState;
use crate::errors::ApiError;
use adapters::{NewReservation, Reservation};
use axum::{extract::State, http::StatusCode, Json};

#[tracing::instrument(skip(state))]
pub async fn add_reservation(
    State(state): State<AppState>,
    Json(reservation): Json<NewReservation>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    if reservation.end_date < reservation.start_date {
        return Err(ApiError::BadRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }

    let reservation = state.store.add_reservation(reservation).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}
