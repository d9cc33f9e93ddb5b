//! Main entry point for the student admin dashboard backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, runs pending migrations, and registers all API routes and
//! middleware.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use crate::utils::jwt::JwtUtils;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let jwt = Arc::new(JwtUtils::new(&config));

    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();
    sqlx::migrate!().run(&pool).await.unwrap();

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/api/students", api::student::routes::student_router())
        .nest(
            "/api/password-requests",
            api::password_request::routes::password_request_router(),
        )
        .layer(Extension(pool))
        .layer(Extension(jwt));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!(
        "Starting student admin dashboard server on port {}",
        config.server_port
    );
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Student Admin Dashboard API",
            "version": "0.1.0"
        }),
        "Welcome to the Student Admin Dashboard API",
    ))
}
