//! User roles and role parsing.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a recognized role.
#[derive(thiserror::Error, Debug, Clone)]
#[error("role must be ADMIN, USER, or OWNER")]
pub struct RoleParseError;

/// The role a user acts under.
///
/// Roles are serialized uppercase on the wire and in the database:
/// `ADMIN`, `USER`, `OWNER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Platform administrator: manages users and stores.
    Admin,
    /// Customer: browses stores and submits ratings.
    User,
    /// Store owner: views aggregate ratings for their store.
    Owner,
}

impl Role {
    /// Returns the canonical uppercase name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Owner => "OWNER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "OWNER" => Ok(Self::Owner),
            _ => Err(RoleParseError),
        }
    }
}
