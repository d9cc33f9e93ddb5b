//! Database repository for password change requests.
//!
//! Requests are created by students and adjudicated by admins; records are
//! never deleted. The status transitions themselves run inside a service
//! transaction, so this repository only covers creation and reads.

use crate::database::models::{
    CreatePasswordRequest, PasswordRequest, PasswordRequestView, RequestStatus,
};
use anyhow::Result;
use sqlx::SqlitePool;

const REQUEST_COLUMNS: &str = "id, student_id, student_name, student_email, new_password, \
                               status, reason, admin_id, admin_name, requested_at, processed_at";

const VIEW_COLUMNS: &str = "id, student_id, student_name, student_email, \
                            status, reason, admin_id, admin_name, requested_at, processed_at";

/// Repository for password change request database operations.
pub struct PasswordRequestRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> PasswordRequestRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new password change request with status `pending`.
    pub async fn create_request(&self, request: CreatePasswordRequest) -> Result<PasswordRequest> {
        let request = sqlx::query_as::<_, PasswordRequest>(&format!(
            r#"
            INSERT INTO password_requests
                (id, student_id, student_name, student_email, new_password, status, reason, requested_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request.id)
        .bind(request.student_id)
        .bind(request.student_name)
        .bind(request.student_email)
        .bind(request.new_password)
        .bind(RequestStatus::Pending)
        .bind(request.reason)
        .bind(request.requested_at)
        .fetch_one(self.pool)
        .await?;

        Ok(request)
    }

    /// Retrieves a request by its unique identifier.
    ///
    /// # Returns
    /// `Some(PasswordRequest)` if found, `None` otherwise
    pub async fn get_request_by_id(&self, id: &str) -> Result<Option<PasswordRequest>> {
        let request = sqlx::query_as::<_, PasswordRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM password_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(request)
    }

    /// Retrieves all requests, optionally filtered by status, newest first.
    /// The result set is unbounded by contract.
    pub async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PasswordRequestView>> {
        let requests = match status {
            Some(status) => {
                sqlx::query_as::<_, PasswordRequestView>(&format!(
                    r#"
                    SELECT {VIEW_COLUMNS} FROM password_requests
                    WHERE status = ? ORDER BY requested_at DESC
                    "#
                ))
                .bind(status)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PasswordRequestView>(&format!(
                    "SELECT {VIEW_COLUMNS} FROM password_requests ORDER BY requested_at DESC"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(requests)
    }

    /// Retrieves the requests belonging to one student, newest first.
    pub async fn list_requests_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<PasswordRequestView>> {
        let requests = sqlx::query_as::<_, PasswordRequestView>(&format!(
            r#"
            SELECT {VIEW_COLUMNS} FROM password_requests
            WHERE student_id = ? ORDER BY requested_at DESC
            "#
        ))
        .bind(student_id)
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }

    /// Counts a student's requests with the given status.
    pub async fn count_requests_by_status(
        &self,
        student_id: &str,
        status: RequestStatus,
    ) -> Result<u32> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM password_requests WHERE student_id = ? AND status = ?",
        )
        .bind(student_id)
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok(count as u32)
    }
}
