//! Integration test harness for the Shoprate API.
//!
//! Each [`TestApp`] owns a fresh in-memory `SQLite` database with the
//! migrations applied and drives the real router in-process through
//! `tower::ServiceExt::oneshot`, so the whole HTTP surface is exercised
//! without binding a port.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use shoprate_core::Role;
use shoprate_server::config::ServerConfig;
use shoprate_server::db::MIGRATOR;
use shoprate_server::routes;
use shoprate_server::services::auth::AuthService;
use shoprate_server::state::AppState;

static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A test instance of the API backed by its own in-memory database.
pub struct TestApp {
    router: Router,
    pool: SqlitePool,
}

impl TestApp {
    /// Spin up a migrated in-memory database and build the router on it.
    pub async fn spawn() -> Self {
        let n = DB_COUNTER.fetch_add(1, Ordering::Relaxed);
        let url = format!("sqlite:file:shoprate_it_{n}?mode=memory&cache=shared");
        let options = SqliteConnectOptions::from_str(&url)
            .expect("valid test database url")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("connect to in-memory database");
        MIGRATOR.run(&pool).await.expect("run migrations");

        let config = ServerConfig {
            database_url: SecretString::from(url),
            host: "127.0.0.1".parse().expect("loopback address"),
            port: 0,
            jwt_secret: SecretString::from("iT9#qW2$eR5@tY8%uP3&oL6*kJ1!hG4z"),
            token_ttl_hours: 1,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(&config, pool.clone());
        let router = routes::router(state);

        Self { router, pool }
    }

    /// Direct access to the underlying pool for state assertions.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Send one request through the router and decode the JSON body.
    ///
    /// Empty bodies decode as `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    /// Seed a user with an explicit role directly through the service
    /// layer, then log in over HTTP and return the bearer token.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str, role: Role) -> String {
        AuthService::new(&self.pool)
            .create_user(name, email, password, None, role)
            .await
            .expect("seed user");
        self.login(email, password).await
    }

    /// Log in over HTTP and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token in response").to_owned()
    }
}
