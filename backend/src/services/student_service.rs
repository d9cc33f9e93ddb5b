//! Student management business logic.
//!
//! Admin-side CRUD over student records plus the student-facing dashboard.

use crate::auth::service::{hash_password, validate_request};
use crate::database::models::{
    CreateStudent, CreateStudentRequest, DEFAULT_COURSE, RequestStatus, RequestStatusCounts,
    Student, StudentDashboard, StudentInfo, UpdateStudentRequest,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::password_request_repository::PasswordRequestRepository;
use crate::repositories::student_repository::StudentRepository;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct StudentService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> StudentService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Retrieves all students, newest enrollment first.
    pub async fn list_students(&self) -> ServiceResult<Vec<StudentInfo>> {
        let students = StudentRepository::new(self.pool).list_students().await?;
        Ok(students.into_iter().map(StudentInfo::from).collect())
    }

    /// Retrieves a single student by id.
    pub async fn get_student(&self, id: &str) -> ServiceResult<StudentInfo> {
        let student = StudentRepository::new(self.pool)
            .get_student_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", id))?;

        Ok(StudentInfo::from(student))
    }

    /// Creates a student record on behalf of an admin.
    ///
    /// Mirrors registration validation but issues no token.
    pub async fn create_student(
        &self,
        request: CreateStudentRequest,
    ) -> ServiceResult<StudentInfo> {
        validate_request(&request)?;

        let repo = StudentRepository::new(self.pool);
        if repo.email_exists(&request.email).await? {
            return Err(ServiceError::already_exists("Student", &request.email));
        }

        let password_hash = hash_password(&request.password)?;
        let student = repo
            .create_student(CreateStudent {
                id: Uuid::now_v7().to_string(),
                name: request.name,
                email: request.email,
                password_hash,
                course: request.course.unwrap_or_else(|| DEFAULT_COURSE.to_string()),
                enrolled_at: chrono::Utc::now(),
            })
            .await?;

        Ok(StudentInfo::from(student))
    }

    /// Updates a student record on behalf of an admin.
    pub async fn update_student(
        &self,
        id: &str,
        request: UpdateStudentRequest,
    ) -> ServiceResult<StudentInfo> {
        validate_request(&request)?;

        let repo = StudentRepository::new(self.pool);
        let existing = repo
            .get_student_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", id))?;

        let name = request.name.unwrap_or_else(|| existing.name.clone());
        let email = request.email.unwrap_or_else(|| existing.email.clone());
        let course = request.course.unwrap_or_else(|| existing.course.clone());

        if email != existing.email && repo.email_exists_excluding(&email, id).await? {
            return Err(ServiceError::already_exists("Student", &email));
        }

        let updated = repo
            .update_student(id, &name, &email, &course)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", id))?;

        Ok(StudentInfo::from(updated))
    }

    /// Deletes a student record. Their password change requests are kept;
    /// the denormalized snapshots keep those records meaningful.
    pub async fn delete_student(&self, id: &str) -> ServiceResult<()> {
        let deleted = StudentRepository::new(self.pool).delete_student(id).await?;

        if !deleted {
            return Err(ServiceError::not_found("Student", id));
        }

        Ok(())
    }

    /// Builds the dashboard for the authenticated student.
    pub async fn dashboard(&self, student: &Student) -> ServiceResult<StudentDashboard> {
        let repo = PasswordRequestRepository::new(self.pool);

        let pending = repo
            .count_requests_by_status(&student.id, RequestStatus::Pending)
            .await?;
        let approved = repo
            .count_requests_by_status(&student.id, RequestStatus::Approved)
            .await?;
        let rejected = repo
            .count_requests_by_status(&student.id, RequestStatus::Rejected)
            .await?;

        Ok(StudentDashboard {
            student: StudentInfo::from(student.clone()),
            password_requests: RequestStatusCounts {
                pending,
                approved,
                rejected,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn create_request(email: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            name: "Sam Student".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            course: Some("Rust Bootcamp".to_string()),
        }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let pool = test_pool().await;
        let service = StudentService::new(&pool);

        let created = service.create_student(create_request("sam@example.com")).await.unwrap();
        assert_eq!(created.course, "Rust Bootcamp");
        assert_eq!(created.role, "student");

        let fetched = service.get_student(&created.id).await.unwrap();
        assert_eq!(fetched.email, "sam@example.com");

        let updated = service
            .update_student(
                &created.id,
                UpdateStudentRequest {
                    name: None,
                    email: Some("sam+new@example.com".to_string()),
                    course: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "sam+new@example.com");
        assert_eq!(updated.name, "Sam Student");

        service.delete_student(&created.id).await.unwrap();
        let gone = service.get_student(&created.id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn duplicate_email_rejected_on_create_and_update() {
        let pool = test_pool().await;
        let service = StudentService::new(&pool);

        let first = service.create_student(create_request("a@example.com")).await.unwrap();
        service.create_student(create_request("b@example.com")).await.unwrap();

        let duplicate = service.create_student(create_request("a@example.com")).await;
        assert!(matches!(duplicate, Err(ServiceError::AlreadyExists { .. })));

        let collision = service
            .update_student(
                &first.id,
                UpdateStudentRequest {
                    name: None,
                    email: Some("b@example.com".to_string()),
                    course: None,
                },
            )
            .await;
        assert!(matches!(collision, Err(ServiceError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn unknown_student_yields_not_found() {
        let pool = test_pool().await;
        let service = StudentService::new(&pool);

        assert!(matches!(
            service.get_student("missing").await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete_student("missing").await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
