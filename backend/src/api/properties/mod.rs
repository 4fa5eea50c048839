//! Module for the property search and listing API.
//!
//! This module exposes the filtered property search and property creation
//! through HTTP endpoints.

pub mod handlers;
pub mod routes;
