//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB ping)
//!
//! # Auth
//! POST /auth/register          - Register a customer account
//! POST /auth/login             - Login, returns a bearer token
//! PUT  /auth/change-password   - Change own password (any role)
//!
//! # Admin (ADMIN role)
//! GET  /admin/dashboard        - Platform totals and global average
//! POST /admin/users            - Create a user with an explicit role
//! GET  /admin/users            - List users (search/role/sort/order)
//! GET  /admin/users/{id}       - User detail incl. owner average
//! POST /admin/stores           - Create a store, optionally owned
//! GET  /admin/stores           - List stores with live averages
//!
//! # Owner (OWNER role)
//! GET  /owner/dashboard        - Own store with average and count
//! GET  /owner/ratings          - Per-rating list with rater identity
//!
//! # Customer (USER role)
//! GET  /user/stores            - Stores with averages and own rating
//! POST /user/ratings           - Submit or overwrite a rating (upsert)
//! PUT  /user/ratings/{id}      - Change a rating by its id
//! ```

pub mod admin;
pub mod auth;
pub mod owner;
pub mod user;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/change-password", put(auth::change_password))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/users", post(admin::create_user).get(admin::list_users))
        .route("/users/{id}", get(admin::get_user))
        .route("/stores", post(admin::create_store).get(admin::list_stores))
}

/// Create the owner routes router.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(owner::dashboard))
        .route("/ratings", get(owner::ratings))
}

/// Create the customer routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/stores", get(user::stores))
        .route("/ratings", post(user::submit_rating))
        .route("/ratings/{id}", put(user::update_rating))
}

/// Assemble the full application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        .nest("/owner", owner_routes())
        .nest("/user", user_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
