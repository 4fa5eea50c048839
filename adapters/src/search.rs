//! Statement builder for the property search.
//!
//! [`SearchQuery::build`] turns a sparse [`PropertySearch`] into SQL text with
//! numbered `$n` placeholders plus the parameters those placeholders refer to,
//! in order. Row-level predicates are collected first and only then joined, so
//! a search with no row-level criteria never emits a bare `WHERE`.

use serde::Deserialize;

/// Row cap used when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 10;

const SELECT_LISTINGS: &str = "SELECT properties.*, avg(property_reviews.rating)::float8 AS average_rating \
FROM properties \
JOIN property_reviews ON property_reviews.property_id = properties.id";

/// Optional search criteria. Every present field must hold for a property to
/// match.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertySearch {
    /// Case-sensitive substring of `properties.city`.
    pub city: Option<String>,
    pub owner_id: Option<i32>,
    /// Inclusive lower bound on `cost_per_night`.
    pub minimum_price_per_night: Option<i32>,
    /// Inclusive upper bound on `cost_per_night`.
    pub maximum_price_per_night: Option<i32>,
    /// Inclusive lower bound on the average review rating.
    pub minimum_rating: Option<f64>,
}

/// A value bound to one positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    BigInt(i64),
    Float(f64),
}

/// Statement text and its ordered parameter list. `params[k]` is bound to
/// `$k+1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SearchQuery {
    pub fn build(search: &PropertySearch, limit: Option<i64>) -> Self {
        let mut params = Vec::new();
        let mut predicates = Vec::new();

        if let Some(city) = search.city.as_deref().filter(|city| !city.is_empty()) {
            let n = push(&mut params, SqlParam::Text(format!("%{city}%")));
            predicates.push(format!("properties.city LIKE ${n}"));
        }

        if let Some(owner_id) = search.owner_id {
            let n = push(&mut params, SqlParam::Int(owner_id));
            predicates.push(format!("properties.owner_id = ${n}"));
        }

        if let Some(min) = search.minimum_price_per_night {
            let n = push(&mut params, SqlParam::Int(min));
            predicates.push(format!("properties.cost_per_night >= ${n}"));
        }

        if let Some(max) = search.maximum_price_per_night {
            let n = push(&mut params, SqlParam::Int(max));
            predicates.push(format!("properties.cost_per_night <= ${n}"));
        }

        let mut sql = String::from(SELECT_LISTINGS);

        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        sql.push_str(" GROUP BY properties.id");

        // Postgres does not resolve output aliases in HAVING, so the aggregate is repeated.
        if let Some(rating) = search.minimum_rating {
            let n = push(&mut params, SqlParam::Float(rating));
            sql.push_str(&format!(" HAVING avg(property_reviews.rating)::float8 >= ${n}"));
        }

        sql.push_str(" ORDER BY properties.cost_per_night ASC");

        let n = push(&mut params, SqlParam::BigInt(limit.unwrap_or(DEFAULT_LIMIT)));
        sql.push_str(&format!(" LIMIT ${n}"));

        Self { sql, params }
    }

    /// Number of `$n` placeholders in the statement text.
    pub fn placeholder_count(&self) -> usize {
        placeholder_indices(&self.sql).len()
    }
}

/// Appends `param` and returns its 1-based position.
fn push(params: &mut Vec<SqlParam>, param: SqlParam) -> usize {
    params.push(param);
    params.len()
}

/// Indices of every `$n` placeholder, in text order.
pub(crate) fn placeholder_indices(sql: &str) -> Vec<usize> {
    let mut indices = Vec::new();
    let mut chars = sql.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            continue;
        }
        let mut digits = String::new();
        while let Some((_, d)) = chars.peek().copied().filter(|(_, d)| d.is_ascii_digit()) {
            digits.push(d);
            chars.next();
        }
        if let Ok(n) = digits.parse() {
            indices.push(n);
        }
    }

    indices
}
