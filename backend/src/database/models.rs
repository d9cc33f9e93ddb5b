//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database, along with the request DTOs that feed them. Row structs
//! carrying credential hashes deliberately do not implement `Serialize`;
//! API responses go through the view models at the bottom of this file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Course assigned to students who register without one.
pub const DEFAULT_COURSE: &str = "MERN Bootcamp";

/// Administrator principal. Email is unique within the `admins` table only;
/// an admin and a student may share an email.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student principal. `enrolled_at` is set at creation and never updated.
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub course: String,
    pub enrolled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A student-initiated, admin-adjudicated proposal to replace the student's
/// stored credential. `student_name`/`student_email` are snapshots taken at
/// creation so the record stays meaningful if the student is later altered.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordRequest {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    /// Proposed credential, stored pre-hashed. Never serialized.
    pub new_password: String,
    pub status: RequestStatus,
    pub reason: String,
    pub admin_id: Option<String>,
    pub admin_name: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a password change request. Status is monotonic:
/// `Pending` may move to exactly one of `Approved` or `Rejected`,
/// both of which are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub course: String,
    pub enrolled_at: DateTime<Utc>,
}

/// Registration / admin-create payload for a student.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(max = 255, message = "Course name too long"))]
    pub course: Option<String>,
}

/// Registration payload for an admin.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Partial update of a student profile. Absent fields are left unchanged;
/// `enrolled_at` is immutable and not updatable through any path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: Option<String>,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Course name too long"))]
    pub course: Option<String>,
}

/// Student-submitted password change payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPasswordRequest {
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,

    #[validate(length(max = 1000, message = "Reason too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePasswordRequest {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub new_password: String,
    pub reason: String,
    pub requested_at: DateTime<Utc>,
}

/// Admin-supplied rejection payload. The reason overwrites whatever the
/// student originally wrote on the request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RejectPasswordRequest {
    #[validate(length(max = 1000, message = "Reason too long"))]
    pub reason: Option<String>,
}

// View models for API responses (the credential hash never leaves the
// server boundary)

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequestView {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub status: RequestStatus,
    pub reason: String,
    pub admin_id: Option<String>,
    pub admin_name: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub course: String,
    pub enrolled_at: DateTime<Utc>,
}

impl From<Student> for StudentInfo {
    fn from(student: Student) -> Self {
        StudentInfo {
            id: student.id,
            name: student.name,
            email: student.email,
            role: "student".to_string(),
            course: student.course,
            enrolled_at: student.enrolled_at,
        }
    }
}

/// Password request totals per status, shown on the student dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct RequestStatusCounts {
    pub pending: u32,
    pub approved: u32,
    pub rejected: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub student: StudentInfo,
    pub password_requests: RequestStatusCounts,
}
