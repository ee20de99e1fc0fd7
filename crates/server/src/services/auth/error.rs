//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and authorization.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shoprate_core::EmailError),

    /// Name outside the accepted length range.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Address exceeds the accepted length.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// No `Authorization: Bearer` token on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// Token failed signature or shape checks.
    #[error("invalid token")]
    InvalidToken,

    /// Token was valid once but has expired.
    #[error("token expired")]
    TokenExpired,

    /// Authenticated, but the role does not grant access here.
    #[error("insufficient role")]
    WrongRole,

    /// Token could not be signed.
    #[error("token signing error")]
    TokenSigning,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
