//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for registration, login,
//! session introspection, and profile updates, and delegate the core
//! business logic to `auth::service`.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::{AuthResponse, LoginRequest, Principal, UserInfo};
use crate::auth::service::AuthService;
use crate::database::models::{
    CreateAdminRequest, CreateStudentRequest, StudentInfo, UpdateStudentRequest,
};
use crate::errors::ServiceError;
use crate::utils::jwt::JwtUtils;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Handle student registration.
#[axum::debug_handler]
pub async fn register_student(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<Arc<JwtUtils>>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), (StatusCode, String)> {
    let service = AuthService::new(&pool, &jwt);

    match service.register_student(payload).await {
        Ok(response) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(
                response,
                "Student registered successfully",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle admin registration.
#[axum::debug_handler]
pub async fn register_admin(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<Arc<JwtUtils>>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), (StatusCode, String)> {
    let service = AuthService::new(&pool, &jwt);

    match service.register_admin(payload).await {
        Ok(response) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(
                response,
                "Admin registered successfully",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle student login.
#[axum::debug_handler]
pub async fn login_student(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<Arc<JwtUtils>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, (StatusCode, String)> {
    let service = AuthService::new(&pool, &jwt);

    match service.login_student(payload).await {
        Ok(response) => Ok(Json(ApiResponse::success(response, "Login successful"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle admin login.
#[axum::debug_handler]
pub async fn login_admin(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<Arc<JwtUtils>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, (StatusCode, String)> {
    let service = AuthService::new(&pool, &jwt);

    match service.login_admin(payload).await {
        Ok(response) => Ok(Json(ApiResponse::success(response, "Login successful"))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Return the principal resolved from the bearer token.
#[axum::debug_handler]
pub async fn me(
    Extension(principal): Extension<Principal>,
) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::success(
        UserInfo::from(&principal),
        "User retrieved successfully",
    ))
}

/// Update the authenticated student's own profile.
#[axum::debug_handler]
pub async fn update_profile(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<Arc<JwtUtils>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<Json<ApiResponse<StudentInfo>>, (StatusCode, String)> {
    let student = match &principal {
        Principal::Student(student) => student,
        Principal::Admin(_) => {
            return Err(service_error_to_http(ServiceError::permission_denied(
                "Access denied. Insufficient permissions.",
            )));
        }
    };

    let service = AuthService::new(&pool, &jwt);

    match service.update_student_profile(student, payload).await {
        Ok(info) => Ok(Json(ApiResponse::success(
            info,
            "Profile updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
