//! Handler functions for student management API endpoints.
//!
//! These functions process requests for student records, delegate to the
//! `StudentService`, and translate outcomes into HTTP responses.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::Principal;
use crate::database::models::{
    CreateStudentRequest, StudentDashboard, StudentInfo, UpdateStudentRequest,
};
use crate::errors::ServiceError;
use crate::services::student_service::StudentService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use sqlx::SqlitePool;

/// Retrieves all students.
#[axum::debug_handler]
pub async fn list_students(
    Extension(pool): Extension<SqlitePool>,
) -> Result<Json<ApiResponse<Vec<StudentInfo>>>, (StatusCode, String)> {
    let service = StudentService::new(&pool);

    match service.list_students().await {
        Ok(students) => Ok(Json(ApiResponse::success(
            students,
            "Students retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves a student by id.
#[axum::debug_handler]
pub async fn get_student(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StudentInfo>>, (StatusCode, String)> {
    let service = StudentService::new(&pool);

    match service.get_student(&id).await {
        Ok(student) => Ok(Json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Creates a student record.
#[axum::debug_handler]
pub async fn create_student(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StudentInfo>>), (StatusCode, String)> {
    let service = StudentService::new(&pool);

    match service.create_student(payload).await {
        Ok(student) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(
                student,
                "Student created successfully",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Updates a student record.
#[axum::debug_handler]
pub async fn update_student(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<Json<ApiResponse<StudentInfo>>, (StatusCode, String)> {
    let service = StudentService::new(&pool);

    match service.update_student(&id, payload).await {
        Ok(student) => Ok(Json(ApiResponse::success(
            student,
            "Student updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Deletes a student record.
#[axum::debug_handler]
pub async fn delete_student(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    let service = StudentService::new(&pool);

    match service.delete_student(&id).await {
        Ok(()) => Ok(Json(ApiResponse::success(
            (),
            "Student deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Builds the dashboard for the authenticated student.
#[axum::debug_handler]
pub async fn dashboard(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<StudentDashboard>>, (StatusCode, String)> {
    let student = match &principal {
        Principal::Student(student) => student,
        Principal::Admin(_) => {
            return Err(service_error_to_http(ServiceError::permission_denied(
                "Access denied. Insufficient permissions.",
            )));
        }
    };

    let service = StudentService::new(&pool);

    match service.dashboard(student).await {
        Ok(dashboard) => Ok(Json(ApiResponse::success(
            dashboard,
            "Dashboard retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
