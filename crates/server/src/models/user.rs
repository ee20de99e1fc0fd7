//! User model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use shoprate_core::{Email, Role, UserId};

/// A user row, including the credential hash.
///
/// Never serialized directly; convert to [`PublicUser`] before responding
/// so the hash cannot leak.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub address: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user shape exposed over the API.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: Option<String>,
    pub role: Role,
}

/// Admin detail view of a user: the public shape plus, for owners, the
/// live average rating across the stores they own (0 for everyone else).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserDetail {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: Option<String>,
    pub role: Role,
    pub average_rating: f64,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            role: user.role,
        }
    }
}
