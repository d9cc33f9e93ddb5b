//! Password change workflow business logic.
//!
//! Students submit requests; admins adjudicate them. A request's status is
//! monotonic: `pending` may move to exactly one of `approved` or `rejected`,
//! and both outcomes are terminal. Approval swaps the student's stored
//! credential in the same transaction that records the transition, and the
//! transition itself is a conditional update on `status = 'pending'`, so a
//! concurrent approve/reject pair yields exactly one success.

use crate::auth::service::{hash_password, validate_request};
use crate::database::models::{
    Admin, CreatePasswordRequest, PasswordRequest, PasswordRequestView, RejectPasswordRequest,
    RequestStatus, Student, SubmitPasswordRequest,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::password_request_repository::PasswordRequestRepository;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const DEFAULT_SUBMIT_REASON: &str = "Password change requested";
const DEFAULT_REJECT_REASON: &str = "Request rejected by admin";

pub struct PasswordRequestService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> PasswordRequestService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Submits a password change request on behalf of the authenticated
    /// student.
    ///
    /// The proposed password is hashed before it is stored, and the
    /// student's name and email are snapshotted so the record stays
    /// meaningful if the student is later altered. Multiple pending
    /// requests from the same student may coexist.
    pub async fn submit_request(
        &self,
        student: &Student,
        request: SubmitPasswordRequest,
    ) -> ServiceResult<PasswordRequest> {
        validate_request(&request)?;

        let new_password = hash_password(&request.new_password)?;

        let created = PasswordRequestRepository::new(self.pool)
            .create_request(CreatePasswordRequest {
                id: Uuid::now_v7().to_string(),
                student_id: student.id.clone(),
                student_name: student.name.clone(),
                student_email: student.email.clone(),
                new_password,
                reason: request
                    .reason
                    .filter(|reason| !reason.is_empty())
                    .unwrap_or_else(|| DEFAULT_SUBMIT_REASON.to_string()),
                requested_at: Utc::now(),
            })
            .await?;

        Ok(created)
    }

    /// Retrieves all requests for an admin, optionally filtered by status,
    /// newest first.
    pub async fn list_all(
        &self,
        status: Option<RequestStatus>,
    ) -> ServiceResult<Vec<PasswordRequestView>> {
        let requests = PasswordRequestRepository::new(self.pool)
            .list_requests(status)
            .await?;

        Ok(requests)
    }

    /// Retrieves the authenticated student's own requests, newest first.
    pub async fn list_for_student(
        &self,
        student: &Student,
    ) -> ServiceResult<Vec<PasswordRequestView>> {
        let requests = PasswordRequestRepository::new(self.pool)
            .list_requests_by_student(&student.id)
            .await?;

        Ok(requests)
    }

    /// Approves a pending request, replacing the student's stored
    /// credential with the one carried by the request.
    ///
    /// The status transition and the credential swap commit together;
    /// no observer can see an approved request whose student still has the
    /// old password.
    pub async fn approve(&self, admin: &Admin, request_id: &str) -> ServiceResult<()> {
        let request = self.get_pending_request(request_id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        let processed_at = Utc::now();
        let rows_affected = sqlx::query(
            r#"
            UPDATE password_requests
            SET status = ?, admin_id = ?, admin_name = ?, processed_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(RequestStatus::Approved)
        .bind(&admin.id)
        .bind(&admin.name)
        .bind(processed_at)
        .bind(request_id)
        .bind(RequestStatus::Pending)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServiceError::Database { source: e.into() })?
        .rows_affected();

        // Lost a race against another approve/reject on the same request.
        if rows_affected == 0 {
            return Err(ServiceError::AlreadyProcessed);
        }

        let rows_affected = sqlx::query(
            "UPDATE students SET password_hash = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&request.new_password)
        .bind(processed_at)
        .bind(&request.student_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServiceError::Database { source: e.into() })?
        .rows_affected();

        // The student was deleted since the request was created; dropping
        // the transaction rolls the status transition back.
        if rows_affected == 0 {
            return Err(ServiceError::not_found("Student", &request.student_id));
        }

        tx.commit()
            .await
            .map_err(|e| ServiceError::Database { source: e.into() })?;

        tracing::info!(
            "Password request {} approved by admin {}",
            request_id,
            admin.id
        );
        Ok(())
    }

    /// Rejects a pending request, recording the admin's reason.
    ///
    /// The admin-supplied reason overwrites whatever the student originally
    /// wrote. The student's credential is never touched by rejection.
    pub async fn reject(
        &self,
        admin: &Admin,
        request_id: &str,
        request: RejectPasswordRequest,
    ) -> ServiceResult<()> {
        validate_request(&request)?;
        self.get_pending_request(request_id).await?;

        let reason = request
            .reason
            .filter(|reason| !reason.is_empty())
            .unwrap_or_else(|| DEFAULT_REJECT_REASON.to_string());

        let rows_affected = sqlx::query(
            r#"
            UPDATE password_requests
            SET status = ?, admin_id = ?, admin_name = ?, reason = ?, processed_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(RequestStatus::Rejected)
        .bind(&admin.id)
        .bind(&admin.name)
        .bind(reason)
        .bind(Utc::now())
        .bind(request_id)
        .bind(RequestStatus::Pending)
        .execute(self.pool)
        .await
        .map_err(|e| ServiceError::Database { source: e.into() })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(ServiceError::AlreadyProcessed);
        }

        tracing::info!(
            "Password request {} rejected by admin {}",
            request_id,
            admin.id
        );
        Ok(())
    }

    /// Fetches a request and checks it is still pending. The conditional
    /// updates above re-check the status, so this is only an early exit.
    async fn get_pending_request(&self, request_id: &str) -> ServiceResult<PasswordRequest> {
        let request = PasswordRequestRepository::new(self.pool)
            .get_request_by_id(request_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Password change request", request_id))?;

        if request.status != RequestStatus::Pending {
            return Err(ServiceError::AlreadyProcessed);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::service::verify_password;
    use crate::database::models::{CreateAdmin, CreateStudent};
    use crate::database::test_pool;
    use crate::repositories::admin_repository::AdminRepository;
    use crate::repositories::student_repository::StudentRepository;

    async fn seed_student(pool: &SqlitePool, email: &str, password: &str) -> Student {
        StudentRepository::new(pool)
            .create_student(CreateStudent {
                id: Uuid::now_v7().to_string(),
                name: "Sam Student".to_string(),
                email: email.to_string(),
                password_hash: hash_password(password).unwrap(),
                course: "MERN Bootcamp".to_string(),
                enrolled_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    async fn seed_admin(pool: &SqlitePool) -> Admin {
        AdminRepository::new(pool)
            .create_admin(CreateAdmin {
                id: Uuid::now_v7().to_string(),
                name: "Ada Admin".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: hash_password("admin-pass").unwrap(),
            })
            .await
            .unwrap()
    }

    fn submission(new_password: &str, reason: Option<&str>) -> SubmitPasswordRequest {
        SubmitPasswordRequest {
            new_password: new_password.to_string(),
            reason: reason.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn submit_creates_pending_request() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let student = seed_student(&pool, "sam@example.com", "old-pass").await;

        let request = service
            .submit_request(&student, submission("secret1", Some("forgot it")))
            .await
            .unwrap();

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.student_id, student.id);
        assert_eq!(request.student_name, "Sam Student");
        assert_eq!(request.student_email, "sam@example.com");
        assert_eq!(request.reason, "forgot it");
        assert!(request.admin_id.is_none());
        assert!(request.processed_at.is_none());
        // stored pre-hashed, never in plaintext
        assert_ne!(request.new_password, "secret1");
        assert!(verify_password("secret1", &request.new_password).unwrap());
    }

    #[tokio::test]
    async fn submit_rejects_short_password_without_creating_a_record() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let student = seed_student(&pool, "sam@example.com", "old-pass").await;

        let result = service
            .submit_request(&student, submission("five5", None))
            .await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));

        let requests = service.list_for_student(&student).await.unwrap();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn submit_defaults_the_reason() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let student = seed_student(&pool, "sam@example.com", "old-pass").await;

        let request = service
            .submit_request(&student, submission("secret1", None))
            .await
            .unwrap();
        assert_eq!(request.reason, "Password change requested");
    }

    #[tokio::test]
    async fn approve_swaps_the_credential_and_finalizes_the_request() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let student = seed_student(&pool, "sam@example.com", "old-pass").await;
        let admin = seed_admin(&pool).await;

        let request = service
            .submit_request(&student, submission("secret1", None))
            .await
            .unwrap();

        service.approve(&admin, &request.id).await.unwrap();

        let processed = PasswordRequestRepository::new(&pool)
            .get_request_by_id(&request.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(processed.status, RequestStatus::Approved);
        assert_eq!(processed.admin_id.as_deref(), Some(admin.id.as_str()));
        assert_eq!(processed.admin_name.as_deref(), Some("Ada Admin"));
        assert!(processed.processed_at.is_some());

        // the new password now verifies and the old one no longer does
        let updated = StudentRepository::new(&pool)
            .get_student_by_id(&student.id)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("secret1", &updated.password_hash).unwrap());
        assert!(!verify_password("old-pass", &updated.password_hash).unwrap());
    }

    #[tokio::test]
    async fn reject_overwrites_the_reason_and_keeps_the_credential() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let student = seed_student(&pool, "sam@example.com", "old-pass").await;
        let admin = seed_admin(&pool).await;

        let request = service
            .submit_request(&student, submission("secret1", Some("student reason")))
            .await
            .unwrap();

        service
            .reject(
                &admin,
                &request.id,
                RejectPasswordRequest {
                    reason: Some("policy violation".to_string()),
                },
            )
            .await
            .unwrap();

        let processed = PasswordRequestRepository::new(&pool)
            .get_request_by_id(&request.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(processed.status, RequestStatus::Rejected);
        assert_eq!(processed.reason, "policy violation");
        assert!(processed.processed_at.is_some());

        let untouched = StudentRepository::new(&pool)
            .get_student_by_id(&student.id)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("old-pass", &untouched.password_hash).unwrap());
    }

    #[tokio::test]
    async fn processed_requests_are_terminal() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let student = seed_student(&pool, "sam@example.com", "old-pass").await;
        let admin = seed_admin(&pool).await;

        let request = service
            .submit_request(&student, submission("secret1", None))
            .await
            .unwrap();
        service
            .reject(&admin, &request.id, RejectPasswordRequest { reason: None })
            .await
            .unwrap();

        // approving a rejected request fails and mutates nothing
        let result = service.approve(&admin, &request.id).await;
        assert!(matches!(result, Err(ServiceError::AlreadyProcessed)));

        let unchanged = PasswordRequestRepository::new(&pool)
            .get_request_by_id(&request.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.status, RequestStatus::Rejected);
        assert_eq!(unchanged.reason, "Request rejected by admin");

        let untouched = StudentRepository::new(&pool)
            .get_student_by_id(&student.id)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("old-pass", &untouched.password_hash).unwrap());

        let again = service
            .reject(&admin, &request.id, RejectPasswordRequest { reason: None })
            .await;
        assert!(matches!(again, Err(ServiceError::AlreadyProcessed)));
    }

    #[tokio::test]
    async fn concurrent_adjudication_yields_exactly_one_success() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let student = seed_student(&pool, "sam@example.com", "old-pass").await;
        let admin = seed_admin(&pool).await;

        let request = service
            .submit_request(&student, submission("secret1", None))
            .await
            .unwrap();

        let (approved, rejected) = tokio::join!(
            service.approve(&admin, &request.id),
            service.reject(&admin, &request.id, RejectPasswordRequest { reason: None }),
        );

        let successes = [approved.is_ok(), rejected.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count();
        assert_eq!(successes, 1);

        let outcome = PasswordRequestRepository::new(&pool)
            .get_request_by_id(&request.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(outcome.status, RequestStatus::Pending);
        assert!(outcome.processed_at.is_some());
    }

    #[tokio::test]
    async fn unknown_request_yields_not_found() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let admin = seed_admin(&pool).await;

        let result = service.approve(&admin, "missing").await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn students_only_see_their_own_requests_without_the_hash() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let sam = seed_student(&pool, "sam@example.com", "old-pass").await;
        let kim = seed_student(&pool, "kim@example.com", "old-pass").await;

        service
            .submit_request(&sam, submission("secret1", None))
            .await
            .unwrap();
        service
            .submit_request(&kim, submission("secret2", None))
            .await
            .unwrap();

        let mine = service.list_for_student(&sam).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].student_id, sam.id);

        // the serialized view never carries the proposed credential
        let serialized = serde_json::to_value(&mine[0]).unwrap();
        assert!(serialized.get("newPassword").is_none());
        assert!(serialized.get("new_password").is_none());
    }

    #[tokio::test]
    async fn list_all_filters_by_status_and_orders_newest_first() {
        let pool = test_pool().await;
        let service = PasswordRequestService::new(&pool);
        let student = seed_student(&pool, "sam@example.com", "old-pass").await;
        let admin = seed_admin(&pool).await;

        let first = service
            .submit_request(&student, submission("secret1", None))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = service
            .submit_request(&student, submission("secret2", None))
            .await
            .unwrap();

        service.approve(&admin, &first.id).await.unwrap();

        let all = service.list_all(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let pending = service.list_all(Some(RequestStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);

        let approved = service.list_all(Some(RequestStatus::Approved)).await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, first.id);
    }
}
