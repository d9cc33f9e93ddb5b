//! Core business logic for the authentication system.

use crate::auth::models::{AuthResponse, LoginRequest, UserInfo};
use crate::database::models::{
    CreateAdmin, CreateAdminRequest, CreateStudent, CreateStudentRequest, DEFAULT_COURSE, Student,
    StudentInfo, UpdateStudentRequest,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::admin_repository::AdminRepository;
use crate::repositories::student_repository::StudentRepository;
use crate::utils::jwt::JwtUtils;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Authentication service for registration, login, and profile updates.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt: &'a JwtUtils,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, jwt: &'a JwtUtils) -> Self {
        Self { pool, jwt }
    }

    /// Registers a new student and issues a token for the fresh account.
    pub async fn register_student(
        &self,
        request: CreateStudentRequest,
    ) -> ServiceResult<AuthResponse> {
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

        let token = self.jwt.generate_token(&student.id, "student")?;

        Ok(AuthResponse {
            token,
            user: UserInfo::from(&student),
        })
    }

    /// Registers a new admin and issues a token for the fresh account.
    pub async fn register_admin(&self, request: CreateAdminRequest) -> ServiceResult<AuthResponse> {
        validate_request(&request)?;

        let repo = AdminRepository::new(self.pool);
        if repo.email_exists(&request.email).await? {
            return Err(ServiceError::already_exists("Admin", &request.email));
        }

        let password_hash = hash_password(&request.password)?;
        let admin = repo
            .create_admin(CreateAdmin {
                id: Uuid::now_v7().to_string(),
                name: request.name,
                email: request.email,
                password_hash,
            })
            .await?;

        let token = self.jwt.generate_token(&admin.id, "admin")?;

        Ok(AuthResponse {
            token,
            user: UserInfo::from(&admin),
        })
    }

    /// Authenticates a student by email and password.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login_student(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        validate_request(&request)?;

        let student = StudentRepository::new(self.pool)
            .get_student_by_email(&request.email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &student.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.jwt.generate_token(&student.id, "student")?;

        Ok(AuthResponse {
            token,
            user: UserInfo::from(&student),
        })
    }

    /// Authenticates an admin by email and password.
    pub async fn login_admin(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        validate_request(&request)?;

        let admin = AdminRepository::new(self.pool)
            .get_admin_by_email(&request.email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &admin.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.jwt.generate_token(&admin.id, "admin")?;

        Ok(AuthResponse {
            token,
            user: UserInfo::from(&admin),
        })
    }

    /// Updates the authenticated student's own profile.
    ///
    /// Absent fields keep their current values; changing the email re-checks
    /// uniqueness against the students table only.
    pub async fn update_student_profile(
        &self,
        student: &Student,
        request: UpdateStudentRequest,
    ) -> ServiceResult<StudentInfo> {
        validate_request(&request)?;

        let repo = StudentRepository::new(self.pool);

        let name = request.name.unwrap_or_else(|| student.name.clone());
        let email = request.email.unwrap_or_else(|| student.email.clone());
        let course = request.course.unwrap_or_else(|| student.course.clone());

        if email != student.email && repo.email_exists_excluding(&email, &student.id).await? {
            return Err(ServiceError::already_exists("Student", &email));
        }

        let updated = repo
            .update_student(&student.id, &name, &email, &course)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student", &student.id))?;

        Ok(StudentInfo::from(updated))
    }
}

/// Formats validator errors into a single validation failure.
pub fn validate_request<T: Validate>(request: &T) -> ServiceResult<()> {
    if let Err(validation_errors) = request.validate() {
        let error_messages: Vec<String> = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();
        return Err(ServiceError::validation(error_messages.join(", ")));
    }
    Ok(())
}

/// Hashes a password before it is stored.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| ServiceError::validation(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against the stored hash.
pub fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
    verify(password, hash)
        .map_err(|e| ServiceError::validation(format!("Password verification failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::test_pool;

    fn jwt() -> JwtUtils {
        JwtUtils::new(&Config::for_tests())
    }

    fn student_registration(email: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            name: "Sam Student".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            course: None,
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let pool = test_pool().await;
        let jwt = jwt();
        let service = AuthService::new(&pool, &jwt);

        let registered = service
            .register_student(student_registration("sam@example.com"))
            .await
            .unwrap();
        assert_eq!(registered.user.role, "student");
        assert_eq!(registered.user.course.as_deref(), Some("MERN Bootcamp"));

        let logged_in = service
            .login_student(LoginRequest {
                email: "sam@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        // the issued token resolves back to the same principal
        let claims = jwt.validate_token(&logged_in.token).unwrap();
        assert_eq!(claims.principal_id(), registered.user.id);
        assert_eq!(claims.role(), "student");
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let pool = test_pool().await;
        let jwt = jwt();
        let service = AuthService::new(&pool, &jwt);

        service
            .register_student(student_registration("sam@example.com"))
            .await
            .unwrap();

        let wrong_password = service
            .login_student(LoginRequest {
                email: "sam@example.com".to_string(),
                password: "not-the-password".to_string(),
            })
            .await;
        assert!(matches!(wrong_password, Err(ServiceError::InvalidCredentials)));

        let unknown_email = service
            .login_student(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;
        assert!(matches!(unknown_email, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_email_is_per_table() {
        let pool = test_pool().await;
        let jwt = jwt();
        let service = AuthService::new(&pool, &jwt);

        service
            .register_student(student_registration("shared@example.com"))
            .await
            .unwrap();

        let duplicate = service
            .register_student(student_registration("shared@example.com"))
            .await;
        assert!(matches!(duplicate, Err(ServiceError::AlreadyExists { .. })));

        // an admin may share a student's email; the tables are disjoint
        // identity spaces
        service
            .register_admin(CreateAdminRequest {
                name: "Ada Admin".to_string(),
                email: "shared@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn registration_rejects_short_password() {
        let pool = test_pool().await;
        let jwt = jwt();
        let service = AuthService::new(&pool, &jwt);

        let result = service
            .register_student(CreateStudentRequest {
                name: "Sam Student".to_string(),
                email: "sam@example.com".to_string(),
                password: "short".to_string(),
                course: None,
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn profile_update_keeps_absent_fields() {
        let pool = test_pool().await;
        let jwt = jwt();
        let service = AuthService::new(&pool, &jwt);

        let registered = service
            .register_student(student_registration("sam@example.com"))
            .await
            .unwrap();
        let student = StudentRepository::new(&pool)
            .get_student_by_id(&registered.user.id)
            .await
            .unwrap()
            .unwrap();

        let updated = service
            .update_student_profile(
                &student,
                UpdateStudentRequest {
                    name: Some("Sam Renamed".to_string()),
                    email: None,
                    course: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Sam Renamed");
        assert_eq!(updated.email, "sam@example.com");
        assert_eq!(updated.course, "MERN Bootcamp");
        assert_eq!(updated.enrolled_at, student.enrolled_at);
    }
}
