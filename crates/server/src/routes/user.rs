//! Customer handlers: store browsing and rating submission.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use shoprate_core::{RatingId, RatingValue, StoreId};

use crate::db::ratings::UpsertOutcome;
use crate::db::sort::{CustomerStoreSortKey, SortOrder};
use crate::db::{RatingRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::models::rating::Rating;
use crate::models::store::StoreWithOwnRating;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub store_id: i64,
    pub rating: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub message: String,
    pub rating: Rating,
}

/// `GET /user/stores` - browse stores with live averages and, per row,
/// the caller's own rating when one exists.
pub async fn stores(
    RequireCustomer(caller): RequireCustomer,
    State(state): State<AppState>,
    Query(query): Query<StoreListQuery>,
) -> Result<Json<Vec<StoreWithOwnRating>>> {
    let sort = CustomerStoreSortKey::from_param(query.sort.as_deref());
    let order = SortOrder::from_param(query.order.as_deref(), SortOrder::Asc);

    let rows = StoreRepository::new(state.pool())
        .list_for_customer(caller.id, query.search.as_deref(), sort, order)
        .await?;

    Ok(Json(rows))
}

/// `POST /user/ratings` - submit a rating for a store.
///
/// One rating per (user, store): a first submission creates the row and
/// responds 201, a resubmission overwrites it in place and responds 200.
pub async fn submit_rating(
    RequireCustomer(caller): RequireCustomer,
    State(state): State<AppState>,
    Json(body): Json<SubmitRatingRequest>,
) -> Result<Response> {
    let value = RatingValue::new(body.rating)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let store_id = StoreId::new(body.store_id);

    let pool = state.pool();
    StoreRepository::new(pool)
        .get_by_id(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_owned()))?;

    let (rating, outcome) = RatingRepository::new(pool)
        .upsert(caller.id, store_id, value)
        .await?;

    let (status, message) = match outcome {
        UpsertOutcome::Created => (StatusCode::CREATED, "Rating submitted successfully"),
        UpsertOutcome::Updated => (StatusCode::OK, "Rating updated successfully"),
    };

    Ok((
        status,
        Json(RatingResponse {
            message: message.to_owned(),
            rating,
        }),
    )
        .into_response())
}

/// `PUT /user/ratings/{id}` - change one of the caller's ratings by id.
///
/// A rating owned by someone else responds 404, same as a missing one.
pub async fn update_rating(
    RequireCustomer(caller): RequireCustomer,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateRatingRequest>,
) -> Result<Json<RatingResponse>> {
    let value = RatingValue::new(body.rating)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let rating = RatingRepository::new(state.pool())
        .update_by_id(RatingId::new(id), caller.id, value)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Rating not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(RatingResponse {
        message: "Rating updated successfully".to_owned(),
        rating,
    }))
}
