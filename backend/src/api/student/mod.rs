//! Module for student management API endpoints.
//!
//! Admin-side CRUD over student records plus the student dashboard.

pub mod handlers;
pub mod routes;
