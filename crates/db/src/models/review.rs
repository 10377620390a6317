//! Review model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A review joined with its author's username and its title's name.
///
/// Serializes as `{id, text, score, author, title, pub_date}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub text: String,
    pub score: i32,
    #[serde(rename = "author")]
    pub author_username: String,
    #[serde(rename = "title")]
    pub title_name: String,
    pub pub_date: Timestamp,
    #[serde(skip)]
    pub title_id: DbId,
    #[serde(skip)]
    pub author_id: DbId,
}

/// DTO for creating a review. Author and title come from the request context.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub title_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i32>,
}
