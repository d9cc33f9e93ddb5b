//! Data structures for authentication-related entities.
//!
//! Defines the resolved `Principal`, login/registration payloads, and the
//! `UserInfo` shape returned to clients (which never carries the credential
//! hash).

use crate::database::models::{Admin, Student};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An authenticated actor: either an admin or a student.
///
/// Admins and students live in separate tables, so the role is structural;
/// a token's claimed role is never consulted for authorization.
#[derive(Debug, Clone)]
pub enum Principal {
    Admin(Admin),
    Student(Student),
}

impl Principal {
    pub fn id(&self) -> &str {
        match self {
            Principal::Admin(admin) => &admin.id,
            Principal::Student(student) => &student.id,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Principal::Admin(_) => "admin",
            Principal::Student(_) => "student",
        }
    }
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for successful registration or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Principal information returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled_at: Option<DateTime<Utc>>,
}

impl From<&Admin> for UserInfo {
    fn from(admin: &Admin) -> Self {
        UserInfo {
            id: admin.id.clone(),
            name: admin.name.clone(),
            email: admin.email.clone(),
            role: admin.role.clone(),
            course: None,
            enrolled_at: None,
        }
    }
}

impl From<&Student> for UserInfo {
    fn from(student: &Student) -> Self {
        UserInfo {
            id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            role: "student".to_string(),
            course: Some(student.course.clone()),
            enrolled_at: Some(student.enrolled_at),
        }
    }
}

impl From<&Principal> for UserInfo {
    fn from(principal: &Principal) -> Self {
        match principal {
            Principal::Admin(admin) => admin.into(),
            Principal::Student(student) => student.into(),
        }
    }
}
