//! Repository for the `users` table.

use sqlx::PgPool;
use yamdb_core::roles::Role;
use yamdb_core::types::DbId;

use crate::models::user::{CreateUser, UpdateProfile, UpdateUser, User, UserListParams};
use crate::{clamp_limit, clamp_offset, contains_pattern, unique_violation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, first_name, last_name, bio, role, \
                        is_staff, is_superuser, last_login_at, created_at";

/// `WHERE` clause for the optional username search (`$1`).
const SEARCH_CLAUSE: &str = "($1::text IS NULL OR username ILIKE $1 ESCAPE '\\')";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a `uq_users_username` / `uq_users_email` unique violation
    /// when either value is taken.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, first_name, last_name, bio, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find the user matching both username and email.
    pub async fn find_by_username_and_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 AND email = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Return the account registered under exactly this (username, email)
    /// pair, creating it when neither value is in use.
    ///
    /// When only one of the two values matches an existing account the insert
    /// fails with a unique violation, which callers report as a conflict. A
    /// violation caused by a concurrent insert of the same pair resolves to
    /// the row that insert created.
    pub async fn get_or_create(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<(User, bool), sqlx::Error> {
        if let Some(user) = Self::find_by_username_and_email(pool, username, email).await? {
            return Ok((user, false));
        }
        match Self::create(pool, &CreateUser::signup(username, email)).await {
            Ok(user) => Ok((user, true)),
            Err(err) if unique_violation(&err).is_some() => {
                match Self::find_by_username_and_email(pool, username, email).await? {
                    Some(user) => Ok((user, false)),
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// List users ordered by id, optionally filtered by username substring.
    pub async fn list(pool: &PgPool, params: &UserListParams) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE {SEARCH_CLAUSE} ORDER BY id LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(params.search.as_deref().map(contains_pattern))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Count users matching the same filter as [`UserRepo::list`].
    pub async fn count(pool: &PgPool, params: &UserListParams) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM users WHERE {SEARCH_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(params.search.as_deref().map(contains_pattern))
            .fetch_one(pool)
            .await
    }

    /// Administrative update. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                role = COALESCE($7, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(input.role.map(Role::as_str))
            .fetch_optional(pool)
            .await
    }

    /// Self-service profile update. The role column is never touched.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a user (cascades to their reviews and comments).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `last_login_at = NOW()`, which also invalidates outstanding
    /// confirmation codes.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Create or promote the bootstrap superuser.
    ///
    /// An existing account with this username keeps its email and profile but
    /// is promoted to admin with both elevated flags set.
    pub async fn ensure_superuser(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, role, is_staff, is_superuser)
             VALUES ($1, $2, 'admin', true, true)
             ON CONFLICT ON CONSTRAINT uq_users_username DO UPDATE SET
                role = 'admin',
                is_staff = true,
                is_superuser = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(email)
            .fetch_one(pool)
            .await
    }
}
