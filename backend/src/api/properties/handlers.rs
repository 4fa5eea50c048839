//! Handler functions for the property API.
//!
//! The search handler turns query-string criteria into a [`PropertySearch`]
//! and returns the matching listings, cheapest first.

use crate::api::{positive_limit, AppState};
use crate::errors::ApiError;
use crate::utils::empty_as_none;
use adapters::{NewProperty, Property, PropertyListing, PropertySearch};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// Query string accepted by `GET /api/properties`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub owner_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub minimum_price_per_night: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub maximum_price_per_night: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub minimum_rating: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
}

impl SearchParams {
    fn into_parts(self) -> (PropertySearch, Option<i64>) {
        let search = PropertySearch {
            city: self.city,
            owner_id: self.owner_id,
            minimum_price_per_night: self.minimum_price_per_night,
            maximum_price_per_night: self.maximum_price_per_night,
            minimum_rating: self.minimum_rating,
        };
        (search, self.limit)
    }
}

#[derive(Debug, Serialize)]
pub struct PropertiesResponse {
    pub properties: Vec<PropertyListing>,
}

#[tracing::instrument(skip(state))]
pub async fn search_properties(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PropertiesResponse>, ApiError> {
    let (search, limit) = params.into_parts();
    let limit = positive_limit(limit)?;

    let properties = state.store.get_all_properties(&search, limit).await?;
    tracing::debug!(count = properties.len(), "property search finished");

    Ok(Json(PropertiesResponse { properties }))
}

#[tracing::instrument(skip(state))]
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Property>, ApiError> {
    state
        .store
        .get_property_with_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("property"))
}

#[tracing::instrument(skip(state, property), fields(owner_id = property.owner_id))]
pub async fn add_property(
    State(state): State<AppState>,
    Json(property): Json<NewProperty>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    let property = state.store.add_property(property).await?;
    Ok((StatusCode::CREATED, Json(property)))
}
