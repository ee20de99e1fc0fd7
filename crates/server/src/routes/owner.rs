//! Owner handlers: store dashboard and the per-rating listing.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use shoprate_core::StoreId;

use crate::db::sort::{RatingSortKey, SortOrder};
use crate::db::{RatingRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::rating::RatingWithRater;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RatingListQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// The owner's store as shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStore {
    pub id: StoreId,
    pub name: String,
}

/// Owner dashboard: the store, its live average, and the rating count.
///
/// The average goes over the wire as a 2-decimal string ("4.00"), not a
/// raw number.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboardResponse {
    pub store: DashboardStore,
    pub average_rating: String,
    pub total_ratings: i64,
}

/// `GET /owner/dashboard` - the caller's store with its live aggregate.
pub async fn dashboard(
    RequireOwner(caller): RequireOwner,
    State(state): State<AppState>,
) -> Result<Json<OwnerDashboardResponse>> {
    let pool = state.pool();
    let store = StoreRepository::new(pool)
        .get_by_owner(caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No store found for this owner".to_owned()))?;

    let (average_rating, total_ratings) = RatingRepository::new(pool)
        .aggregate_for_store(store.id)
        .await?;

    Ok(Json(OwnerDashboardResponse {
        store: DashboardStore {
            id: store.id,
            name: store.name,
        },
        average_rating: format!("{average_rating:.2}"),
        total_ratings,
    }))
}

/// `GET /owner/ratings` - every rating of the caller's store, joined with
/// the rater's name and email. Newest first unless sorted otherwise.
pub async fn ratings(
    RequireOwner(caller): RequireOwner,
    State(state): State<AppState>,
    Query(query): Query<RatingListQuery>,
) -> Result<Json<Vec<RatingWithRater>>> {
    let pool = state.pool();
    let store = StoreRepository::new(pool)
        .get_by_owner(caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No store found for this owner".to_owned()))?;

    let sort = RatingSortKey::from_param(query.sort.as_deref());
    let order = SortOrder::from_param(query.order.as_deref(), SortOrder::Desc);

    let rows = RatingRepository::new(pool)
        .list_for_store(store.id, sort, order)
        .await?;

    Ok(Json(rows))
}
