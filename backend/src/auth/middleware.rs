//! Middleware for protecting authenticated routes and handling authorization.
//!
//! `authenticate` resolves a bearer token to a concrete `Principal` and
//! attaches it to the request; the `require_*` middlewares gate a route on
//! the principal's role.

use crate::api::common::service_error_to_http;
use crate::auth::models::Principal;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::admin_repository::AdminRepository;
use crate::repositories::student_repository::StudentRepository;
use crate::utils::jwt::JwtUtils;
use axum::{
    extract::{Extension, Request},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Session-resolution middleware.
///
/// Extracts the token from an `Authorization: Bearer <token>` header,
/// validates it, and resolves the subject to a principal record. The
/// resolved `Principal` is inserted into the request extensions for
/// downstream handlers and role gates.
pub async fn authenticate(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt): Extension<Arc<JwtUtils>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = bearer_token(request.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok()))
        .map_err(service_error_to_http)?;

    let claims = jwt.validate_token(token).map_err(service_error_to_http)?;

    let principal = resolve_principal(&pool, claims.principal_id())
        .await
        .map_err(service_error_to_http)?;

    tracing::debug!("Resolved {} principal {}", principal.role(), principal.id());
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Admin-only authorization middleware. Must run after `authenticate`.
pub async fn require_admin(
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    authorize(request.extensions().get::<Principal>(), &["admin"])
        .map_err(service_error_to_http)?;
    Ok(next.run(request).await)
}

/// Student-only authorization middleware. Must run after `authenticate`.
pub async fn require_student(
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    authorize(request.extensions().get::<Principal>(), &["student"])
        .map_err(service_error_to_http)?;
    Ok(next.run(request).await)
}

/// Extracts the token from a `Bearer <token>` header value.
fn bearer_token(header: Option<&str>) -> ServiceResult<&str> {
    let header = header.ok_or(ServiceError::MissingToken)?;
    let token = header.strip_prefix("Bearer ").ok_or(ServiceError::MissingToken)?;
    if token.is_empty() {
        return Err(ServiceError::MissingToken);
    }
    Ok(token)
}

/// Resolves a principal identifier against the admins table first, then the
/// students table. Identifiers are store-generated and globally unique, so
/// the order only fixes a deterministic tie-break; both tables are checked
/// because the token's claimed role is never trusted.
async fn resolve_principal(pool: &SqlitePool, principal_id: &str) -> ServiceResult<Principal> {
    if let Some(admin) = AdminRepository::new(pool).get_admin_by_id(principal_id).await? {
        return Ok(Principal::Admin(admin));
    }

    if let Some(student) = StudentRepository::new(pool)
        .get_student_by_id(principal_id)
        .await?
    {
        return Ok(Principal::Student(student));
    }

    // Covers principals deleted after the token was issued.
    Err(ServiceError::not_found("User", principal_id))
}

/// Pure role predicate: the principal's role must be in `allowed_roles`.
fn authorize(principal: Option<&Principal>, allowed_roles: &[&str]) -> ServiceResult<()> {
    let principal = principal.ok_or(ServiceError::Unauthenticated)?;

    if !allowed_roles.contains(&principal.role()) {
        return Err(ServiceError::permission_denied(
            "Access denied. Insufficient permissions.",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Admin, Student};
    use chrono::Utc;

    fn admin_principal() -> Principal {
        Principal::Admin(Admin {
            id: "admin-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: "admin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn student_principal() -> Principal {
        Principal::Student(Student {
            id: "student-1".to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            password_hash: "hash".to_string(),
            course: "MERN Bootcamp".to_string(),
            enrolled_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");

        assert!(matches!(bearer_token(None), Err(ServiceError::MissingToken)));
        assert!(matches!(
            bearer_token(Some("abc.def.ghi")),
            Err(ServiceError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(Some("Basic abc")),
            Err(ServiceError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(Some("Bearer ")),
            Err(ServiceError::MissingToken)
        ));
    }

    #[test]
    fn authorize_role_matrix() {
        let admin = admin_principal();
        let student = student_principal();

        assert!(authorize(Some(&admin), &["admin"]).is_ok());
        assert!(authorize(Some(&student), &["student"]).is_ok());
        assert!(authorize(Some(&admin), &["admin", "student"]).is_ok());
        assert!(authorize(Some(&student), &["admin", "student"]).is_ok());

        assert!(matches!(
            authorize(Some(&student), &["admin"]),
            Err(ServiceError::PermissionDenied { .. })
        ));
        assert!(matches!(
            authorize(Some(&admin), &["student"]),
            Err(ServiceError::PermissionDenied { .. })
        ));
        assert!(matches!(
            authorize(None, &["admin"]),
            Err(ServiceError::Unauthenticated)
        ));
    }
}
