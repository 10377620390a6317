//! Repository for the `titles` table and its `title_genres` junction.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use yamdb_core::catalog::rating_from_average;
use yamdb_core::types::DbId;

use crate::models::classifier::Classifier;
use crate::models::title::{
    CreateTitle, Title, TitleDetails, TitleFilter, TitleWithAverage, UpdateTitle,
};
use crate::{clamp_limit, clamp_offset, contains_pattern};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.name, t.year, t.description, t.category_id";

/// Rating source: the average review score, computed on read.
const AVERAGE_SCORE: &str =
    "(SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.id) AS average_score";

/// Filter predicates bound as `$1` category slug, `$2` genre slug,
/// `$3` name pattern, `$4` year.
const FILTER_CLAUSE: &str = "($1::text IS NULL OR EXISTS (
        SELECT 1 FROM categories c WHERE c.id = t.category_id AND c.slug = $1))
    AND ($2::text IS NULL OR EXISTS (
        SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id
        WHERE tg.title_id = t.id AND g.slug = $2))
    AND ($3::text IS NULL OR t.name ILIKE $3 ESCAPE '\\')
    AND ($4::int IS NULL OR t.year = $4)";

/// A genre together with the title it is attached to.
#[derive(FromRow)]
struct TitleGenre {
    title_id: DbId,
    #[sqlx(flatten)]
    genre: Classifier,
}

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<Title, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let title = sqlx::query_as::<_, Title>(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, year, description, category_id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_genres_inner(&mut tx, title.id, &input.genre_ids).await?;

        tx.commit().await?;
        Ok(title)
    }

    /// Whether a title with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a bare title row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Title>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM titles t WHERE t.id = $1");
        sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a title with its rating, category and genres.
    pub async fn find_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TitleDetails>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS}, {AVERAGE_SCORE} FROM titles t WHERE t.id = $1");
        let row = sqlx::query_as::<_, TitleWithAverage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Self::attach_relations(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// List titles ordered by name, applying every filter present in `filter`.
    pub async fn list_details(
        pool: &PgPool,
        filter: &TitleFilter,
    ) -> Result<Vec<TitleDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, {AVERAGE_SCORE} FROM titles t
             WHERE {FILTER_CLAUSE}
             ORDER BY t.name, t.id
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, TitleWithAverage>(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .bind(clamp_limit(filter.limit))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await?;

        Self::attach_relations(pool, rows).await
    }

    /// Count titles matching the same filters as [`TitleRepo::list_details`].
    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM titles t WHERE {FILTER_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .fetch_one(pool)
            .await
    }

    /// Update a title. Only non-`None` fields are applied; `genre_ids`, when
    /// present, replaces all genre links in the same transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
    ) -> Result<Option<Title>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let title = sqlx::query_as::<_, Title>(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
             WHERE id = $1
             RETURNING id, name, year, description, category_id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(title) = title else {
            return Ok(None);
        };

        if let Some(genre_ids) = &input.genre_ids {
            Self::set_genres_inner(&mut tx, title.id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(title))
    }

    /// Delete a title (cascades to its reviews and their comments).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the genre links of a title within an open transaction.
    async fn set_genres_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title_id)
            .execute(&mut **tx)
            .await?;

        if !genre_ids.is_empty() {
            sqlx::query(
                "INSERT INTO title_genres (title_id, genre_id)
                 SELECT $1, UNNEST($2::bigint[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(title_id)
            .bind(genre_ids)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Resolve categories and genres for a batch of title rows with two
    /// queries, preserving the order of `rows`.
    async fn attach_relations(
        pool: &PgPool,
        rows: Vec<TitleWithAverage>,
    ) -> Result<Vec<TitleDetails>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let title_ids: Vec<DbId> = rows.iter().map(|r| r.title.id).collect();
        let category_ids: Vec<DbId> = rows.iter().filter_map(|r| r.title.category_id).collect();

        let categories: HashMap<DbId, Classifier> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, Classifier>(
                "SELECT id, name, slug FROM categories WHERE id = ANY($1)",
            )
            .bind(&category_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
        };

        let links = sqlx::query_as::<_, TitleGenre>(
            "SELECT tg.title_id, g.id, g.name, g.slug
             FROM title_genres tg
             JOIN genres g ON g.id = tg.genre_id
             WHERE tg.title_id = ANY($1)
             ORDER BY g.name",
        )
        .bind(&title_ids)
        .fetch_all(pool)
        .await?;

        let mut genres: HashMap<DbId, Vec<Classifier>> = HashMap::new();
        for link in links {
            genres.entry(link.title_id).or_default().push(link.genre);
        }

        Ok(rows
            .into_iter()
            .map(|row| TitleDetails {
                rating: rating_from_average(row.average_score),
                category: row
                    .title
                    .category_id
                    .and_then(|id| categories.get(&id).cloned()),
                genres: genres.remove(&row.title.id).unwrap_or_default(),
                title: row.title,
            })
            .collect())
    }
}
