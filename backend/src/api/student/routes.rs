//! Defines the HTTP routes for student management.
//!
//! Record CRUD is restricted to admins; the dashboard belongs to the
//! authenticated student. The literal `/dashboard` segment takes priority
//! over the `{id}` matcher, so it cannot be shadowed.

use super::handlers::*;
use crate::auth::middleware::{authenticate, require_admin, require_student};
use axum::{Router, middleware, routing::get};

pub fn student_router() -> Router {
    Router::new()
        .route(
            "/dashboard",
            get(dashboard)
                .layer(middleware::from_fn(require_student))
                .layer(middleware::from_fn(authenticate)),
        )
        .route(
            "/",
            get(list_students)
                .post(create_student)
                .layer(middleware::from_fn(require_admin))
                .layer(middleware::from_fn(authenticate)),
        )
        .route(
            "/{id}",
            get(get_student)
                .put(update_student)
                .delete(delete_student)
                .layer(middleware::from_fn(require_admin))
                .layer(middleware::from_fn(authenticate)),
        )
}
