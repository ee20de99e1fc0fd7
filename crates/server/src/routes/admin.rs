//! Admin handlers: dashboard, user management, store management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use shoprate_core::{Email, Role, UserId};

use crate::db::sort::{SortOrder, StoreSortKey, UserSortKey};
use crate::db::{RatingRepository, StoreRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::store::{Store, StoreListing};
use crate::models::user::{PublicUser, UserDetail};
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StoreListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Platform-wide totals for the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
    pub average_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct CreatedStoreResponse {
    pub message: String,
    pub store: Store,
}

/// `GET /admin/dashboard` - platform totals and the global average rating.
///
/// Every number is computed live; nothing here is cached or stored.
pub async fn dashboard(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>> {
    let pool = state.pool();
    let total_users = UserRepository::new(pool).count().await?;
    let total_stores = StoreRepository::new(pool).count().await?;

    let ratings = RatingRepository::new(pool);
    let total_ratings = ratings.count().await?;
    let average_rating = ratings.global_average().await?;

    Ok(Json(DashboardResponse {
        total_users,
        total_stores,
        total_ratings,
        average_rating,
    }))
}

/// `POST /admin/users` - create a user with an explicit role.
pub async fn create_user(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>)> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .create_user(
            &body.name,
            &body.email,
            &body.password,
            body.address.as_deref(),
            body.role,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: "User created successfully".to_owned(),
            user: user.into(),
        }),
    ))
}

/// `GET /admin/users` - list users with search, role filter, and sorting.
pub async fn list_users(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<PublicUser>>> {
    let role = match query.role.as_deref() {
        None => None,
        Some(raw) => Some(
            raw.parse::<Role>()
                .map_err(|_| AppError::Validation(format!("unknown role '{raw}'")))?,
        ),
    };

    let sort = UserSortKey::from_param(query.sort.as_deref());
    let order = SortOrder::from_param(query.order.as_deref(), SortOrder::Asc);

    let users = UserRepository::new(state.pool())
        .list(query.search.as_deref(), role, sort, order)
        .await?;

    Ok(Json(users))
}

/// `GET /admin/users/{id}` - user detail, with the live average rating of
/// the user's stores when the user is an owner.
pub async fn get_user(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDetail>> {
    let detail = UserRepository::new(state.pool())
        .get_detail(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(detail))
}

/// `POST /admin/stores` - create a store, optionally assigned to an owner.
///
/// When an owner is given it must be an existing account with the `OWNER`
/// role; the reference stays a plain foreign key, nothing else links them.
pub async fn create_store(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<CreatedStoreResponse>)> {
    let email = Email::parse(&body.email)
        .map_err(|_| AppError::Validation("Please provide a valid email".to_owned()))?;
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("store name is required".to_owned()));
    }
    if body.address.trim().is_empty() || body.address.chars().count() > 400 {
        return Err(AppError::Validation(
            "address is required and must not exceed 400 characters".to_owned(),
        ));
    }

    let pool = state.pool();
    let owner_id = match body.owner_id {
        None => None,
        Some(raw) => {
            let id = UserId::new(raw);
            let owner = UserRepository::new(pool)
                .get_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound("Owner not found".to_owned()))?;
            if owner.role != Role::Owner {
                return Err(AppError::Validation(
                    "owner must be an account with the OWNER role".to_owned(),
                ));
            }
            Some(id)
        }
    };

    let store = StoreRepository::new(pool)
        .create(&body.name, &email, &body.address, owner_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedStoreResponse {
            message: "Store created successfully".to_owned(),
            store,
        }),
    ))
}

/// `GET /admin/stores` - list stores with live averages and owner names.
pub async fn list_stores(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<StoreListQuery>,
) -> Result<Json<Vec<StoreListing>>> {
    let sort = StoreSortKey::from_param(query.sort.as_deref());
    let order = SortOrder::from_param(query.order.as_deref(), SortOrder::Asc);

    let stores = StoreRepository::new(state.pool())
        .list(query.search.as_deref(), sort, order)
        .await?;

    Ok(Json(stores))
}
