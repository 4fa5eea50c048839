//! Central module for organizing the application's API endpoints.
//!
//! This module acts as a top-level container for the property, user and
//! reservation routers and the state they share. Every handler performs a
//! single store call.

pub mod properties;
pub mod reservations;
pub mod user;

use crate::errors::ApiError;
use crate::middleware;
use adapters::StoreAdapter;
use axum::{routing::get, Router};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StoreAdapter>,
}

impl AppState {
    pub fn new(store: impl StoreAdapter + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/properties", properties::routes::property_router())
        .nest("/api/reservations", reservations::routes::reservation_router())
        .nest("/users", user::routes::user_router())
        .with_state(state);

    middleware::with_tracing(app)
}

async fn health() -> &'static str {
    "ok"
}

/// Rejects non-positive row limits before they reach the database.
pub(crate) fn positive_limit(limit: Option<i64>) -> Result<Option<i64>, ApiError> {
    match limit {
        Some(limit) if limit < 1 => Err(ApiError::BadRequest(format!(
            "limit must be a positive integer, got {limit}"
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::{
        GuestReservation, NewProperty, NewReservation, NewUser, Property, PropertyListing,
        PropertySearch, Reservation, StoreError, StoreResult, User,
    };
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::NaiveDate;
    use http_body_util::BodyExt; // for `collect`
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// In-memory store that records the searches it receives.
    #[derive(Default)]
    struct FakeStore {
        users: Mutex<Vec<User>>,
        properties: Mutex<Vec<Property>>,
        searches: Mutex<Vec<(PropertySearch, Option<i64>)>>,
        unavailable: bool,
    }

    impl FakeStore {
        fn with_user() -> Self {
            let store = Self::default();
            store.users.lock().unwrap().push(User {
                id: 1,
                name: "Eva Stanley".to_string(),
                email: "eva@example.com".to_string(),
                password: "secret".to_string(),
            });
            store
        }

        fn check(&self) -> StoreResult<()> {
            if self.unavailable {
                return Err(StoreError::Connection(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    fn property(id: i32, new: NewProperty) -> Property {
        Property {
            id,
            owner_id: new.owner_id,
            title: new.title,
            description: new.description,
            thumbnail_photo_url: new.thumbnail_photo_url,
            cover_photo_url: new.cover_photo_url,
            cost_per_night: new.cost_per_night,
            parking_spaces: new.parking_spaces,
            number_of_bathrooms: new.number_of_bathrooms,
            number_of_bedrooms: new.number_of_bedrooms,
            country: new.country,
            street: new.street,
            city: new.city,
            province: new.province,
            post_code: new.post_code,
            active: true,
        }
    }

    #[async_trait]
    impl StoreAdapter for FakeStore {
        async fn get_user_with_email(&self, email: &str) -> StoreResult<Option<User>> {
            self.check()?;
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn get_user_with_id(&self, id: i32) -> StoreResult<Option<User>> {
            self.check()?;
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn add_user(&self, user: NewUser) -> StoreResult<User> {
            self.check()?;
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(StoreError::Constraint {
                    constraint: Some("users_email_key".to_string()),
                    message: "duplicate key value violates unique constraint".to_string(),
                });
            }
            let user = User {
                id: users.len() as i32 + 1,
                name: user.name,
                email: user.email,
                password: user.password,
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn get_all_reservations(
            &self,
            _guest_id: i32,
            _limit: Option<i64>,
        ) -> StoreResult<Vec<GuestReservation>> {
            self.check()?;
            Ok(Vec::new())
        }

        async fn add_reservation(&self, reservation: NewReservation) -> StoreResult<Reservation> {
            self.check()?;
            Ok(Reservation {
                id: 1,
                start_date: reservation.start_date,
                end_date: reservation.end_date,
                property_id: reservation.property_id,
                guest_id: reservation.guest_id,
            })
        }

        async fn get_all_properties(
            &self,
            search: &PropertySearch,
            limit: Option<i64>,
        ) -> StoreResult<Vec<PropertyListing>> {
            self.check()?;
            self.searches.lock().unwrap().push((search.clone(), limit));
            let properties = self.properties.lock().unwrap();
            Ok(properties
                .iter()
                .cloned()
                .map(|property| PropertyListing {
                    property,
                    average_rating: 4.5,
                })
                .collect())
        }

        async fn get_property_with_id(&self, id: i32) -> StoreResult<Option<Property>> {
            self.check()?;
            let properties = self.properties.lock().unwrap();
            Ok(properties.iter().find(|p| p.id == id).cloned())
        }

        async fn add_property(&self, new: NewProperty) -> StoreResult<Property> {
            self.check()?;
            let mut properties = self.properties.lock().unwrap();
            let property = property(properties.len() as i32 + 1, new);
            properties.push(property.clone());
            Ok(property)
        }
    }

    fn new_property_json() -> Value {
        json!({
            "owner_id": 1,
            "title": "Lakeside cabin",
            "description": "Quiet cabin by the lake",
            "thumbnail_photo_url": "https://images.example.com/cabin/thumb.jpg",
            "cover_photo_url": "https://images.example.com/cabin/cover.jpg",
            "cost_per_night": 12500,
            "street": "12 Shore Road",
            "city": "Whistler",
            "province": "British Columbia",
            "post_code": "V0N 1B4",
            "country": "Canada",
            "parking_spaces": 2,
            "number_of_bathrooms": 1,
            "number_of_bedrooms": 3
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = router(AppState::new(FakeStore::default()));
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn search_passes_criteria_and_ignores_blank_fields() {
        let store = Arc::new(FakeStore::default());
        let state = AppState {
            store: store.clone(),
        };

        let (status, body) = send(
            router(state),
            get("/api/properties?city=Vancouver&minimum_price_per_night=&maximum_price_per_night=200&minimum_rating=4&limit=3"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "properties": [] }));

        let searches = store.searches.lock().unwrap();
        assert_eq!(
            searches.as_slice(),
            &[(
                PropertySearch {
                    city: Some("Vancouver".to_string()),
                    owner_id: None,
                    minimum_price_per_night: None,
                    maximum_price_per_night: Some(200),
                    minimum_rating: Some(4.0),
                },
                Some(3)
            )]
        );
    }

    #[tokio::test]
    async fn search_without_criteria_uses_the_default_limit() {
        let store = Arc::new(FakeStore::default());
        let state = AppState {
            store: store.clone(),
        };

        let (status, _) = send(router(state), get("/api/properties")).await;

        assert_eq!(status, StatusCode::OK);
        let searches = store.searches.lock().unwrap();
        assert_eq!(searches.as_slice(), &[(PropertySearch::default(), None)]);
    }

    #[tokio::test]
    async fn non_positive_limit_is_rejected() {
        let app = router(AppState::new(FakeStore::default()));
        let (status, body) = send(app, get("/api/properties?limit=0")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn created_property_can_be_fetched() {
        let store = Arc::new(FakeStore::default());
        let state = AppState {
            store: store.clone(),
        };
        let app = router(state);

        let (status, created) =
            send(app.clone(), post_json("/api/properties", new_property_json())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "Lakeside cabin");
        assert_eq!(created["active"], true);

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = send(app.clone(), get(&format!("/api/properties/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, listings) = send(app, get("/api/properties")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listings["properties"][0]["title"], "Lakeside cabin");
        assert_eq!(listings["properties"][0]["average_rating"], 4.5);
    }

    #[tokio::test]
    async fn unknown_property_is_not_found() {
        let app = router(AppState::new(FakeStore::default()));
        let (status, _) = send(app, get("/api/properties/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn users_are_returned_without_passwords() {
        let app = router(AppState::new(FakeStore::with_user()));

        let (status, body) = send(app.clone(), get("/users/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "id": 1, "name": "Eva Stanley", "email": "eva@example.com" })
        );

        let (status, body) = send(app.clone(), get("/users?email=eva@example.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);

        let (status, _) = send(app, get("/users/2")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let app = router(AppState::new(FakeStore::with_user()));

        let (status, body) = send(
            app.clone(),
            post_json(
                "/users",
                json!({ "name": "Eva Again", "email": "eva@example.com", "password": "x" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("users_email_key"));

        let (status, body) = send(
            app,
            post_json(
                "/users",
                json!({ "name": "Louisa Meyer", "email": "louisa@example.com", "password": "x" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 2);
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn reservations_are_listed_and_created() {
        let app = router(AppState::new(FakeStore::with_user()));

        let (status, body) = send(app.clone(), get("/users/1/reservations?limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reservations": [] }));

        let (status, body) = send(
            app.clone(),
            post_json(
                "/api/reservations",
                json!({
                    "property_id": 3,
                    "guest_id": 1,
                    "start_date": "2024-06-01",
                    "end_date": "2024-06-08"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["start_date"], "2024-06-01");
        assert_eq!(
            NaiveDate::parse_from_str(body["end_date"].as_str().unwrap(), "%Y-%m-%d").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()
        );

        let (status, _) = send(
            app,
            post_json(
                "/api/reservations",
                json!({
                    "property_id": 3,
                    "guest_id": 1,
                    "start_date": "2024-06-08",
                    "end_date": "2024-06-01"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unavailable_database_is_service_unavailable() {
        let store = FakeStore {
            unavailable: true,
            ..Default::default()
        };
        let app = router(AppState::new(store));

        let (status, body) = send(app, get("/api/properties")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": "internal error" }));
    }

    #[test]
    fn positive_limit_accepts_absent_and_positive() {
        assert_eq!(positive_limit(None).unwrap(), None);
        assert_eq!(positive_limit(Some(3)).unwrap(), Some(3));
        assert!(positive_limit(Some(-1)).is_err());
    }
}
