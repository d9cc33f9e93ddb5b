//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations and orchestrate interactions between repositories.

pub mod password_request_service;
pub mod student_service;
