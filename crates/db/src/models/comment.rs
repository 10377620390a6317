//! Comment model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A comment joined with its author's username.
///
/// Serializes as `{id, text, author, review, pub_date}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub text: String,
    #[serde(rename = "author")]
    pub author_username: String,
    #[serde(rename = "review")]
    pub review_id: DbId,
    pub pub_date: Timestamp,
    #[serde(skip)]
    pub author_id: DbId,
}

/// DTO for creating a comment. Author and review come from the request context.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub review_id: DbId,
    pub author_id: DbId,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateComment {
    pub text: Option<String>,
}
