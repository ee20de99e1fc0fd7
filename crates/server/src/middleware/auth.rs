//! Authentication extractors.
//!
//! Provides extractors that verify the request's bearer token and, for the
//! role-scoped variants, enforce the caller's role before the handler runs.
//! Handlers receive the verified [`AuthUser`] explicitly; the rating and
//! listing operations never read identity from anywhere else.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use shoprate_core::Role;

use crate::error::AppError;
use crate::services::auth::{AuthError, AuthUser};
use crate::state::AppState;

/// Extractor that requires a valid bearer token, any role.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", user.id)
/// }
/// ```
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = verify_bearer(parts, state)?;
        Ok(Self(user))
    }
}

/// Extractor requiring an `ADMIN` caller.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = verify_bearer(parts, state)?;
        require_role(user, Role::Admin)?;
        Ok(Self(user))
    }
}

/// Extractor requiring an `OWNER` caller.
pub struct RequireOwner(pub AuthUser);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = verify_bearer(parts, state)?;
        require_role(user, Role::Owner)?;
        Ok(Self(user))
    }
}

/// Extractor requiring a `USER` (customer) caller.
pub struct RequireCustomer(pub AuthUser);

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = verify_bearer(parts, state)?;
        require_role(user, Role::User)?;
        Ok(Self(user))
    }
}

/// Pull the bearer token off the request and verify it.
fn verify_bearer(parts: &Parts, state: &AppState) -> Result<AuthUser, AppError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Auth(AuthError::MissingToken))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Auth(AuthError::MissingToken))?;

    Ok(state.tokens().verify(token)?)
}

/// Reject callers whose role does not match.
fn require_role(user: AuthUser, required: Role) -> Result<(), AppError> {
    if user.role == required {
        Ok(())
    } else {
        Err(AppError::Auth(AuthError::WrongRole))
    }
}
