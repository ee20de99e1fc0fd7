//! Store models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use shoprate_core::{Email, StoreId, UserId};

/// A store row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A store in the admin listing, with its live aggregate rating and the
/// owner's name when an owner is assigned.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StoreListing {
    pub id: StoreId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub average_rating: f64,
    pub owner_name: Option<String>,
}

/// A store in the customer listing: the live aggregate plus the calling
/// user's own rating for the store, when one exists.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StoreWithOwnRating {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub average_rating: f64,
    pub user_rating: Option<i64>,
}
