//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle registration, login, session introspection, and
//! profile updates. They are designed to be integrated into the main Axum
//! router.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// Creates the authentication router with all auth-related routes.
pub fn auth_router() -> Router {
    Router::new()
        .route("/student/register", post(register_student))
        .route("/student/login", post(login_student))
        .route("/admin/register", post(register_admin))
        .route("/admin/login", post(login_admin))
        .route("/me", get(me).layer(middleware::from_fn(authenticate)))
        .route(
            "/profile",
            put(update_profile)
                .layer(middleware::from_fn(require_student))
                .layer(middleware::from_fn(authenticate)),
        )
}
