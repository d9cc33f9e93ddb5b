//! Defines the HTTP routes for the password change workflow.

use super::handlers::*;
use crate::auth::middleware::{authenticate, require_admin, require_student};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

pub fn password_request_router() -> Router {
    Router::new()
        .route(
            "/request",
            post(submit_request)
                .layer(middleware::from_fn(require_student))
                .layer(middleware::from_fn(authenticate)),
        )
        .route(
            "/student",
            get(list_my_requests)
                .layer(middleware::from_fn(require_student))
                .layer(middleware::from_fn(authenticate)),
        )
        .route(
            "/",
            get(list_all_requests)
                .layer(middleware::from_fn(require_admin))
                .layer(middleware::from_fn(authenticate)),
        )
        .route(
            "/{request_id}/approve",
            put(approve_request)
                .layer(middleware::from_fn(require_admin))
                .layer(middleware::from_fn(authenticate)),
        )
        .route(
            "/{request_id}/reject",
            put(reject_request)
                .layer(middleware::from_fn(require_admin))
                .layer(middleware::from_fn(authenticate)),
        )
}
