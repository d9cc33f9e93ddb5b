//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the different API domains
//! (student management and the password change workflow), excluding core
//! authentication routes which are handled separately.

pub mod common;
pub mod password_request;
pub mod student;
