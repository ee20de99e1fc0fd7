//! Store repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use shoprate_core::{Email, StoreId, UserId};

use super::RepositoryError;
use super::sort::{CustomerStoreSortKey, SortOrder, StoreSortKey};
use crate::models::store::{Store, StoreListing, StoreWithOwnRating};

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a store by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, name, email, address, owner_id, created_at, updated_at
            FROM stores
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Get the store owned by a user, if any.
    ///
    /// A single store per owner is assumed, matching the owner dashboard's
    /// contract.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner(&self, owner_id: UserId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, name, email, address, owner_id, created_at, updated_at
            FROM stores
            WHERE owner_id = ?
            ",
        )
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Create a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        address: &str,
        owner_id: Option<UserId>,
    ) -> Result<Store, RepositoryError> {
        let now = Utc::now();

        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO stores (name, email, address, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, address, owner_id, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(address)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("store email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(store)
    }

    /// Admin listing: every store with its live aggregate rating and the
    /// owner's name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        sort: StoreSortKey,
        order: SortOrder,
    ) -> Result<Vec<StoreListing>, RepositoryError> {
        let mut sql = String::from(
            r"
            SELECT s.id, s.name, s.email, s.address,
                   CAST(COALESCE(AVG(r.rating), 0) AS REAL) AS average_rating,
                   u.name AS owner_name
            FROM stores s
            LEFT JOIN ratings r ON s.id = r.store_id
            LEFT JOIN users u ON s.owner_id = u.id
            WHERE 1=1
            ",
        );

        if search.is_some() {
            sql.push_str(
                " AND (LOWER(s.name) LIKE LOWER(?) OR LOWER(s.email) LIKE LOWER(?) \
                 OR LOWER(s.address) LIKE LOWER(?))",
            );
        }
        sql.push_str(&format!(
            " GROUP BY s.id, s.name, s.email, s.address, u.name ORDER BY {} {}",
            sort.column(),
            order.sql()
        ));

        let mut query = sqlx::query_as::<_, StoreListing>(&sql);
        if let Some(search) = search {
            let pattern = format!("%{search}%");
            query = query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern);
        }

        Ok(query.fetch_all(self.pool).await?)
    }

    /// Customer listing: every store with its live aggregate rating and the
    /// calling user's own rating (NULL when they have not rated it).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        user_id: UserId,
        search: Option<&str>,
        sort: CustomerStoreSortKey,
        order: SortOrder,
    ) -> Result<Vec<StoreWithOwnRating>, RepositoryError> {
        let mut sql = String::from(
            r"
            SELECT s.id, s.name, s.address,
                   CAST(COALESCE(AVG(r.rating), 0) AS REAL) AS average_rating,
                   (SELECT rating FROM ratings WHERE user_id = ? AND store_id = s.id) AS user_rating
            FROM stores s
            LEFT JOIN ratings r ON s.id = r.store_id
            WHERE 1=1
            ",
        );

        if search.is_some() {
            sql.push_str(" AND (LOWER(s.name) LIKE LOWER(?) OR LOWER(s.address) LIKE LOWER(?))");
        }
        sql.push_str(&format!(
            " GROUP BY s.id, s.name, s.address ORDER BY {} {}",
            sort.column(),
            order.sql()
        ));

        let mut query = sqlx::query_as::<_, StoreWithOwnRating>(&sql).bind(user_id);
        if let Some(search) = search {
            let pattern = format!("%{search}%");
            query = query.bind(pattern.clone()).bind(pattern);
        }

        Ok(query.fetch_all(self.pool).await?)
    }

    /// Total number of stores.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stores")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
