//! User repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use shoprate_core::{Email, Role, UserId};

use super::RepositoryError;
use super::sort::{SortOrder, UserSortKey};
use crate::models::user::{PublicUser, User, UserDetail};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, name, email, password_hash, address, role, created_at, updated_at
            FROM users
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, name, email, password_hash, address, role, created_at, updated_at
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        address: Option<&str>,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (name, email, password_hash, address, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, address, role, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(address)
        .bind(role)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }

    /// Replace a user's credential hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List users with optional search and role filters.
    ///
    /// `search` matches name, email, and address case-insensitively and is
    /// always passed as a bound parameter; sort structure comes only from
    /// the allow-listed enums.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        role: Option<Role>,
        sort: UserSortKey,
        order: SortOrder,
    ) -> Result<Vec<PublicUser>, RepositoryError> {
        let mut sql = String::from(
            r"
            SELECT id, name, email, address, role
            FROM users
            WHERE 1=1
            ",
        );

        if search.is_some() {
            sql.push_str(
                " AND (LOWER(name) LIKE LOWER(?) OR LOWER(email) LIKE LOWER(?) \
                 OR LOWER(COALESCE(address, '')) LIKE LOWER(?))",
            );
        }
        if role.is_some() {
            sql.push_str(" AND role = ?");
        }
        sql.push_str(&format!(" ORDER BY {} {}", sort.column(), order.sql()));

        let mut query = sqlx::query_as::<_, PublicUser>(&sql);
        if let Some(search) = search {
            let pattern = format!("%{search}%");
            query = query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern);
        }
        if let Some(role) = role {
            query = query.bind(role);
        }

        Ok(query.fetch_all(self.pool).await?)
    }

    /// Get a user with their aggregate rating (owners only; 0 otherwise).
    ///
    /// For an `OWNER`, the average is computed live across every rating of
    /// the stores they own.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_detail(&self, id: UserId) -> Result<Option<UserDetail>, RepositoryError> {
        let detail = sqlx::query_as::<_, UserDetail>(
            r"
            SELECT u.id, u.name, u.email, u.address, u.role,
                   CASE
                       WHEN u.role = 'OWNER' THEN (
                           SELECT CAST(COALESCE(AVG(r.rating), 0) AS REAL)
                           FROM ratings r
                           JOIN stores s ON r.store_id = s.id
                           WHERE s.owner_id = u.id
                       )
                       ELSE 0.0
                   END AS average_rating
            FROM users u
            WHERE u.id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(detail)
    }

    /// Total number of users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
