//! Rating ledger repository.
//!
//! The ledger holds at most one row per (user, store) pair. Writes go
//! through a conflict-resolving upsert backed by the unique index, so a
//! concurrent double submission can never produce a second row. Aggregates
//! are computed here at read time and never stored.

use chrono::Utc;
use sqlx::SqlitePool;

use shoprate_core::{RatingId, RatingValue, StoreId, UserId};

use super::RepositoryError;
use super::sort::{RatingSortKey, SortOrder};
use crate::models::rating::{Rating, RatingWithRater};

/// Whether an upsert inserted a fresh row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First submission by this user for this store.
    Created,
    /// The user's existing rating was overwritten.
    Updated,
}

/// Repository for the rating ledger.
pub struct RatingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Submit a rating for (`user_id`, `store_id`), idempotently.
    ///
    /// Overwrites the pair's existing row when there is one; otherwise
    /// inserts. The insert carries `ON CONFLICT (user_id, store_id) DO
    /// UPDATE`, so two concurrent first submissions both land on the same
    /// single row - there is no read-then-write window in which a duplicate
    /// could appear. `id` and `created_at` are stable across overwrites.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        store_id: StoreId,
        value: RatingValue,
    ) -> Result<(Rating, UpsertOutcome), RepositoryError> {
        let now = Utc::now();

        let updated = sqlx::query(
            r"
            UPDATE ratings
            SET rating = ?, updated_at = ?
            WHERE user_id = ? AND store_id = ?
            ",
        )
        .bind(value)
        .bind(now)
        .bind(user_id)
        .bind(store_id)
        .execute(self.pool)
        .await?;

        let outcome = if updated.rows_affected() > 0 {
            UpsertOutcome::Updated
        } else {
            sqlx::query(
                r"
                INSERT INTO ratings (user_id, store_id, rating, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT (user_id, store_id)
                DO UPDATE SET rating = excluded.rating, updated_at = excluded.updated_at
                ",
            )
            .bind(user_id)
            .bind(store_id)
            .bind(value)
            .bind(now)
            .bind(now)
            .execute(self.pool)
            .await?;
            UpsertOutcome::Created
        };

        let rating = self
            .get_by_pair(user_id, store_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok((rating, outcome))
    }

    /// Change the value of a rating addressed by its own id.
    ///
    /// The `user_id` predicate makes ownership part of the lookup: a
    /// rating owned by someone else is indistinguishable from a missing
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no rating with this id is
    /// owned by `user_id`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_by_id(
        &self,
        id: RatingId,
        user_id: UserId,
        value: RatingValue,
    ) -> Result<Rating, RepositoryError> {
        let rating = sqlx::query_as::<_, Rating>(
            r"
            UPDATE ratings
            SET rating = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING id, user_id, store_id, rating, created_at, updated_at
            ",
        )
        .bind(value)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(rating)
    }

    /// Get the rating a user has submitted for a store, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_pair(
        &self,
        user_id: UserId,
        store_id: StoreId,
    ) -> Result<Option<Rating>, RepositoryError> {
        let rating = sqlx::query_as::<_, Rating>(
            r"
            SELECT id, user_id, store_id, rating, created_at, updated_at
            FROM ratings
            WHERE user_id = ? AND store_id = ?
            ",
        )
        .bind(user_id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(rating)
    }

    /// List a store's ratings joined with each rater's name and email,
    /// for the owner's view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(
        &self,
        store_id: StoreId,
        sort: RatingSortKey,
        order: SortOrder,
    ) -> Result<Vec<RatingWithRater>, RepositoryError> {
        let sql = format!(
            r"
            SELECT r.id, r.rating, r.created_at, r.updated_at,
                   u.name AS user_name, u.email AS user_email
            FROM ratings r
            JOIN users u ON r.user_id = u.id
            WHERE r.store_id = ?
            ORDER BY {} {}
            ",
            sort.column(),
            order.sql()
        );

        Ok(sqlx::query_as::<_, RatingWithRater>(&sql)
            .bind(store_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// Live aggregate for one store: (average, count), with average 0 for
    /// a store nobody has rated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn aggregate_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<(f64, i64), RepositoryError> {
        let row: (f64, i64) = sqlx::query_as(
            r"
            SELECT CAST(COALESCE(AVG(rating), 0) AS REAL), COUNT(*)
            FROM ratings
            WHERE store_id = ?
            ",
        )
        .bind(store_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Global average across every rating, 0 when the ledger is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn global_average(&self) -> Result<f64, RepositoryError> {
        let row: (f64,) =
            sqlx::query_as("SELECT CAST(COALESCE(AVG(rating), 0) AS REAL) FROM ratings")
                .fetch_one(self.pool)
                .await?;
        Ok(row.0)
    }

    /// Total number of ratings in the ledger.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ratings")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shoprate_core::{Email, Role};

    use super::*;
    use crate::db::test_support::migrated_pool;
    use crate::db::{StoreRepository, UserRepository};

    async fn seed_customer(pool: &SqlitePool, email: &str) -> UserId {
        UserRepository::new(pool)
            .create(
                "Seeded Test Customer Account",
                &Email::parse(email).unwrap(),
                "$argon2id$fake-hash",
                None,
                Role::User,
            )
            .await
            .unwrap()
            .id
    }

    async fn seed_store(pool: &SqlitePool, email: &str) -> StoreId {
        StoreRepository::new(pool)
            .create("Ledger Test Store", &Email::parse(email).unwrap(), "1 Square", None)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_resubmission_keeps_one_row_with_latest_value() {
        let pool = migrated_pool().await;
        let user = seed_customer(&pool, "u@example.com").await;
        let store = seed_store(&pool, "s@example.com").await;

        let repo = RatingRepository::new(&pool);
        let (first, outcome) = repo
            .upsert(user, store, RatingValue::new(2).unwrap())
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);

        let (second, outcome) = repo
            .upsert(user, store, RatingValue::new(5).unwrap())
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        // Same row, new value; created_at survives the overwrite.
        assert_eq!(second.id, first.id);
        assert_eq!(second.rating.as_i64(), 5);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_leave_one_row() {
        let pool = migrated_pool().await;
        let user = seed_customer(&pool, "racer@example.com").await;
        let store = seed_store(&pool, "raced@example.com").await;

        let mut handles = Vec::new();
        for value in [1_i64, 2, 3, 4, 5, 5, 4, 3] {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                RatingRepository::new(&pool)
                    .upsert(user, store, RatingValue::new(value).unwrap())
                    .await
                    .map(|(rating, _)| rating)
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let repo = RatingRepository::new(&pool);
        assert_eq!(repo.count().await.unwrap(), 1);

        // Whatever won, the surviving value is one of the submitted ones.
        let rating = repo.get_by_pair(user, store).await.unwrap().unwrap();
        assert!((1..=5).contains(&rating.rating.as_i64()));
    }

    #[tokio::test]
    async fn test_update_by_id_requires_ownership() {
        let pool = migrated_pool().await;
        let owner = seed_customer(&pool, "owner@example.com").await;
        let intruder = seed_customer(&pool, "intruder@example.com").await;
        let store = seed_store(&pool, "store@example.com").await;

        let repo = RatingRepository::new(&pool);
        let (rating, _) = repo
            .upsert(owner, store, RatingValue::new(3).unwrap())
            .await
            .unwrap();

        let err = repo
            .update_by_id(rating.id, intruder, RatingValue::new(1).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        // The row is untouched.
        let unchanged = repo.get_by_pair(owner, store).await.unwrap().unwrap();
        assert_eq!(unchanged.rating.as_i64(), 3);

        let updated = repo
            .update_by_id(rating.id, owner, RatingValue::new(1).unwrap())
            .await
            .unwrap();
        assert_eq!(updated.rating.as_i64(), 1);
        assert_eq!(updated.created_at, rating.created_at);
    }

    #[tokio::test]
    async fn test_aggregate_for_store() {
        let pool = migrated_pool().await;
        let store = seed_store(&pool, "agg@example.com").await;
        let repo = RatingRepository::new(&pool);

        // Empty ledger reports a defined zero, not NULL.
        let (avg, count) = repo.aggregate_for_store(store).await.unwrap();
        assert!((avg - 0.0).abs() < f64::EPSILON);
        assert_eq!(count, 0);

        for (i, value) in [5, 5, 5, 1].into_iter().enumerate() {
            let user = seed_customer(&pool, &format!("agg{i}@example.com")).await;
            repo.upsert(user, store, RatingValue::new(value).unwrap())
                .await
                .unwrap();
        }

        let (avg, count) = repo.aggregate_for_store(store).await.unwrap();
        assert!((avg - 4.0).abs() < f64::EPSILON);
        assert_eq!(count, 4);
        assert!((repo.global_average().await.unwrap() - 4.0).abs() < f64::EPSILON);
    }
}
