//! Business-logic services built on the repositories.

pub mod auth;

pub use auth::{AuthError, AuthService, AuthUser, TokenService};
