//! Core `adapters` crate for LightBnB data access.
//!
//! This crate defines the `StoreAdapter` trait, which lists every read and
//! insert the application performs against its users, properties and
//! reservations, and provides the PostgreSQL implementation (`PgStore`).
//! Each operation is one database round trip that resolves to one value.

pub mod errors;
pub mod models;
pub mod postgres;
pub mod search;

pub use errors::{StoreError, StoreErrorKind};
pub use models::*;
pub use postgres::{PgStore, MIGRATOR};
pub use search::{PropertySearch, SearchQuery, SqlParam, DEFAULT_LIMIT};

use async_trait::async_trait;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Looks up a user by exact email.
    async fn get_user_with_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn get_user_with_id(&self, id: i32) -> StoreResult<Option<User>>;

    /// Inserts a user and returns the stored row. A taken email is a
    /// [`StoreErrorKind::Constraint`] failure.
    async fn add_user(&self, user: NewUser) -> StoreResult<User>;

    /// A guest's reservations joined to the reserved properties, earliest
    /// first. `limit` defaults to [`DEFAULT_LIMIT`].
    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: Option<i64>,
    ) -> StoreResult<Vec<GuestReservation>>;

    async fn add_reservation(&self, reservation: NewReservation) -> StoreResult<Reservation>;

    /// Reviewed properties matching every criterion in `search`, cheapest
    /// first. `limit` defaults to [`DEFAULT_LIMIT`].
    async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: Option<i64>,
    ) -> StoreResult<Vec<PropertyListing>>;

    async fn get_property_with_id(&self, id: i32) -> StoreResult<Option<Property>>;

    async fn add_property(&self, property: NewProperty) -> StoreResult<Property>;
}
