//! Title model, its read representation and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

use super::classifier::Classifier;

/// A row from the `titles` table.
#[derive(Debug, Clone, FromRow)]
pub struct Title {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
}

/// A title row together with the average of its review scores.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct TitleWithAverage {
    #[sqlx(flatten)]
    pub title: Title,
    pub average_score: Option<f64>,
}

/// A title with its rating and resolved category / genres.
#[derive(Debug, Clone)]
pub struct TitleDetails {
    pub title: Title,
    pub rating: Option<i32>,
    pub category: Option<Classifier>,
    pub genres: Vec<Classifier>,
}

/// Public title representation.
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub genre: Vec<Classifier>,
    pub category: Option<Classifier>,
}

impl From<TitleDetails> for TitleResponse {
    fn from(details: TitleDetails) -> Self {
        Self {
            id: details.title.id,
            name: details.title.name,
            year: details.title.year,
            description: details.title.description,
            rating: details.rating,
            genre: details.genres,
            category: details.category,
        }
    }
}

/// DTO for creating a title. Category and genres are already resolved to ids.
#[derive(Debug, Clone)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// DTO for a partial title update. `genre_ids: Some(_)` replaces the whole set.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// Filters for listing titles. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Case-insensitive substring of the title name.
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
