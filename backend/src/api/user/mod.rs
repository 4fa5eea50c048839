//! Module for user profile and management API endpoints.
//!
//! This module handles user registration and lookup, plus the listing of a
//! guest's reservations. There is no login or session handling here.

pub mod handlers;
pub mod routes;
