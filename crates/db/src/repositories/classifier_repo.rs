//! Repository for the `categories` and `genres` tables.
//!
//! Both tables have the same shape, so one repository serves both; every
//! method takes the [`ClassifierKind`] that selects the table.

use sqlx::PgPool;
use yamdb_core::catalog::ClassifierKind;

use crate::models::classifier::{Classifier, ClassifierListParams, CreateClassifier};
use crate::{clamp_limit, clamp_offset, contains_pattern};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug";

/// `WHERE` clause for the optional name search (`$1`).
const SEARCH_CLAUSE: &str = "($1::text IS NULL OR name ILIKE $1 ESCAPE '\\')";

/// Table backing each classifier kind.
pub(crate) const fn table(kind: ClassifierKind) -> &'static str {
    match kind {
        ClassifierKind::Category => "categories",
        ClassifierKind::Genre => "genres",
    }
}

/// Provides CRUD operations for categories and genres.
pub struct ClassifierRepo;

impl ClassifierRepo {
    /// Insert a new classifier, returning the created row.
    ///
    /// Fails with `uq_categories_slug` / `uq_genres_slug` on a duplicate slug.
    pub async fn create(
        pool: &PgPool,
        kind: ClassifierKind,
        input: &CreateClassifier,
    ) -> Result<Classifier, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}",
            table(kind)
        );
        sqlx::query_as::<_, Classifier>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// List classifiers ordered by name, optionally filtered by name substring.
    pub async fn list(
        pool: &PgPool,
        kind: ClassifierKind,
        params: &ClassifierListParams,
    ) -> Result<Vec<Classifier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE {SEARCH_CLAUSE} ORDER BY name, id LIMIT $2 OFFSET $3",
            table(kind)
        );
        sqlx::query_as::<_, Classifier>(&query)
            .bind(params.search.as_deref().map(contains_pattern))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Count classifiers matching the same filter as [`ClassifierRepo::list`].
    pub async fn count(
        pool: &PgPool,
        kind: ClassifierKind,
        params: &ClassifierListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {} WHERE {SEARCH_CLAUSE}", table(kind));
        sqlx::query_scalar::<_, i64>(&query)
            .bind(params.search.as_deref().map(contains_pattern))
            .fetch_one(pool)
            .await
    }

    /// Find a classifier by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        kind: ClassifierKind,
        slug: &str,
    ) -> Result<Option<Classifier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE slug = $1", table(kind));
        sqlx::query_as::<_, Classifier>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find all classifiers whose slug is in `slugs`. Unknown slugs are
    /// simply absent from the result.
    pub async fn find_by_slugs(
        pool: &PgPool,
        kind: ClassifierKind,
        slugs: &[String],
    ) -> Result<Vec<Classifier>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE slug = ANY($1) ORDER BY name",
            table(kind)
        );
        sqlx::query_as::<_, Classifier>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// Delete a classifier by slug. Returns `true` if a row was removed.
    ///
    /// Deleting a category leaves its titles uncategorized; deleting a genre
    /// removes it from every title.
    pub async fn delete_by_slug(
        pool: &PgPool,
        kind: ClassifierKind,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE slug = $1", table(kind));
        let result = sqlx::query(&query).bind(slug).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
