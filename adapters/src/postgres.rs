//! PostgreSQL implementation of [`StoreAdapter`].
//!
//! Every method issues exactly one statement on the shared pool. Rows that do
//! not exist come back as `None`/empty; driver failures are classified into
//! [`StoreError`].

use crate::models::{
    GuestReservation, NewProperty, NewReservation, NewUser, Property, PropertyListing,
    Reservation, User,
};
use crate::search::{PropertySearch, SearchQuery, SqlParam, DEFAULT_LIMIT};
use crate::{StoreAdapter, StoreResult};
use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

/// Schema for the tables `PgStore` reads and writes.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: Vec<SqlParam>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(value) => query.bind(value),
            SqlParam::Int(value) => query.bind(value),
            SqlParam::BigInt(value) => query.bind(value),
            SqlParam::Float(value) => query.bind(value),
        };
    }
    query
}

#[async_trait]
impl StoreAdapter for PgStore {
    #[tracing::instrument(skip(self), err)]
    async fn get_user_with_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_user_with_id(&self, id: i32) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email), err)]
    async fn add_user(&self, user: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id = user.id, "inserted user");
        Ok(user)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: Option<i64>,
    ) -> StoreResult<Vec<GuestReservation>> {
        let reservations = sqlx::query_as::<_, GuestReservation>(
            r#"
            SELECT reservations.id AS reservation_id,
                   reservations.start_date,
                   reservations.end_date,
                   properties.*,
                   avg(property_reviews.rating)::float8 AS average_rating
            FROM reservations
            JOIN properties ON reservations.property_id = properties.id
            LEFT JOIN property_reviews ON property_reviews.property_id = properties.id
            WHERE reservations.guest_id = $1
            GROUP BY reservations.id, properties.id
            ORDER BY reservations.start_date ASC
            LIMIT $2
            "#,
        )
        .bind(guest_id)
        .bind(limit.unwrap_or(DEFAULT_LIMIT))
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    #[tracing::instrument(skip(self), err)]
    async fn add_reservation(&self, reservation: NewReservation) -> StoreResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (start_date, end_date, property_id, guest_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, start_date, end_date, property_id, guest_id
            "#,
        )
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(reservation.property_id)
        .bind(reservation.guest_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(reservation)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: Option<i64>,
    ) -> StoreResult<Vec<PropertyListing>> {
        let SearchQuery { sql, params } = SearchQuery::build(search, limit);
        tracing::trace!(%sql, params = params.len(), "built property search");

        let listings = bind_params(sqlx::query_as::<_, PropertyListing>(&sql), params)
            .fetch_all(&self.pool)
            .await?;

        Ok(listings)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_property_with_id(&self, id: i32) -> StoreResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT *
            FROM properties
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    #[tracing::instrument(skip(self, property), fields(owner_id = property.owner_id), err)]
    async fn add_property(&self, property: NewProperty) -> StoreResult<Property> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                owner_id, title, description, thumbnail_photo_url, cover_photo_url,
                cost_per_night, street, city, province, post_code, country,
                parking_spaces, number_of_bathrooms, number_of_bedrooms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(property.owner_id)
        .bind(property.title)
        .bind(property.description)
        .bind(property.thumbnail_photo_url)
        .bind(property.cover_photo_url)
        .bind(property.cost_per_night)
        .bind(property.street)
        .bind(property.city)
        .bind(property.province)
        .bind(property.post_code)
        .bind(property.country)
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(property_id = property.id, "inserted property");
        Ok(property)
    }
}
