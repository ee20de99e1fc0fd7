//! Rating models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use shoprate_core::{Email, RatingId, RatingValue, StoreId, UserId};

/// A row in the rating ledger.
///
/// At most one row exists per (user, store) pair; repeated submissions
/// mutate `rating` and `updated_at` in place.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Rating {
    pub id: RatingId,
    pub user_id: UserId,
    pub store_id: StoreId,
    pub rating: RatingValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rating joined with the rater's identity, for the owner's view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RatingWithRater {
    pub id: RatingId,
    pub rating: RatingValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: Email,
}
