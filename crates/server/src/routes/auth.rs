//! Authentication handlers: register, login, change password.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::user::PublicUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Response for register and login: a bearer token plus the account.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /auth/register` - create a customer account.
///
/// The role is always `USER`; owner and admin accounts are created by an
/// admin through `/admin/users`.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(
            &body.name,
            &body.email,
            &body.password,
            body.address.as_deref(),
        )
        .await?;

    let token = state.tokens().sign(user.id, user.role)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_owned(),
            token,
            user: user.into(),
        }),
    ))
}

/// `POST /auth/login` - authenticate and issue a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    let token = state.tokens().sign(user.id, user.role)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_owned(),
        token,
        user: user.into(),
    }))
}

/// `PUT /auth/change-password` - change the caller's own password.
///
/// Available to every role; the current password is re-verified first.
pub async fn change_password(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let auth = AuthService::new(state.pool());
    auth.change_password(caller.id, &body.current_password, &body.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_owned(),
    }))
}
