//! Handler functions for the password change workflow API endpoints.
//!
//! These functions process submission, listing, and adjudication requests,
//! delegating the state machine to the `PasswordRequestService`.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::Principal;
use crate::database::models::{
    PasswordRequestView, RejectPasswordRequest, RequestStatus, SubmitPasswordRequest,
};
use crate::errors::ServiceError;
use crate::services::password_request_service::PasswordRequestService;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Identifier of a freshly submitted request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPasswordResponse {
    pub request_id: String,
}

/// Optional status filter for the admin listing.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    pub status: Option<RequestStatus>,
}

fn require_student_principal(
    principal: &Principal,
) -> Result<&crate::database::models::Student, (StatusCode, String)> {
    match principal {
        Principal::Student(student) => Ok(student),
        Principal::Admin(_) => Err(service_error_to_http(ServiceError::permission_denied(
            "Access denied. Insufficient permissions.",
        ))),
    }
}

fn require_admin_principal(
    principal: &Principal,
) -> Result<&crate::database::models::Admin, (StatusCode, String)> {
    match principal {
        Principal::Admin(admin) => Ok(admin),
        Principal::Student(_) => Err(service_error_to_http(ServiceError::permission_denied(
            "Access denied. Insufficient permissions.",
        ))),
    }
}

/// Submit a password change request for the authenticated student.
#[axum::debug_handler]
pub async fn submit_request(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SubmitPasswordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitPasswordResponse>>), (StatusCode, String)> {
    let student = require_student_principal(&principal)?;
    let service = PasswordRequestService::new(&pool);

    match service.submit_request(student, payload).await {
        Ok(request) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SubmitPasswordResponse {
                    request_id: request.id,
                },
                "Password change request submitted successfully. Please wait for admin approval.",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// List the authenticated student's own requests.
#[axum::debug_handler]
pub async fn list_my_requests(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<Vec<PasswordRequestView>>>, (StatusCode, String)> {
    let student = require_student_principal(&principal)?;
    let service = PasswordRequestService::new(&pool);

    match service.list_for_student(student).await {
        Ok(requests) => Ok(Json(ApiResponse::success(
            requests,
            "Password change requests retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// List all requests for an admin, optionally filtered by status.
#[axum::debug_handler]
pub async fn list_all_requests(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<ApiResponse<Vec<PasswordRequestView>>>, (StatusCode, String)> {
    let service = PasswordRequestService::new(&pool);

    match service.list_all(query.status).await {
        Ok(requests) => Ok(Json(ApiResponse::success(
            requests,
            "Password change requests retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Approve a pending request.
#[axum::debug_handler]
pub async fn approve_request(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    let admin = require_admin_principal(&principal)?;
    let service = PasswordRequestService::new(&pool);

    match service.approve(admin, &request_id).await {
        Ok(()) => Ok(Json(ApiResponse::success(
            (),
            "Password change request approved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Reject a pending request with a reason.
#[axum::debug_handler]
pub async fn reject_request(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<String>,
    Json(payload): Json<RejectPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    let admin = require_admin_principal(&principal)?;
    let service = PasswordRequestService::new(&pool);

    match service.reject(admin, &request_id, payload).await {
        Ok(()) => Ok(Json(ApiResponse::success(
            (),
            "Password change request rejected",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
