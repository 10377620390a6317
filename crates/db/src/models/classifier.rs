//! Category / genre model. Both tables share this row shape.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

/// A row from `categories` or `genres`. Serializes as `{name, slug}`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Classifier {
    #[serde(skip)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct CreateClassifier {
    pub name: String,
    pub slug: String,
}

/// Query parameters for listing categories or genres.
#[derive(Debug, Clone, Default)]
pub struct ClassifierListParams {
    /// Case-insensitive substring match on `name`.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
