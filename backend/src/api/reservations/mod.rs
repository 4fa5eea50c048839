//! Module for booking reservations.

pub mod handlers;
pub mod routes;
