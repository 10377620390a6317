//! Shared query parameter types for API handlers.
//!
//! Values are clamped in the repository layer via `clamp_limit` /
//! `clamp_offset`.

use serde::Deserialize;
use yamdb_db::models::classifier::ClassifierListParams;
use yamdb_db::models::title::TitleFilter;
use yamdb_db::models::user::UserListParams;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Pagination plus a free-text `?search=` term.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

impl From<SearchParams> for ClassifierListParams {
    fn from(params: SearchParams) -> Self {
        Self {
            search: params.search_term(),
            limit: params.limit,
            offset: params.offset,
        }
    }
}

impl From<SearchParams> for UserListParams {
    fn from(params: SearchParams) -> Self {
        Self {
            search: params.search_term(),
            limit: params.limit,
            offset: params.offset,
        }
    }
}

/// Title list filters (`?category=&genre=&name=&year=`), slugs for the
/// first two.
#[derive(Debug, Default, Deserialize)]
pub struct TitleFilterParams {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<TitleFilterParams> for TitleFilter {
    fn from(params: TitleFilterParams) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        Self {
            category: non_empty(params.category),
            genre: non_empty(params.genre),
            name: non_empty(params.name),
            year: params.year,
            limit: params.limit,
            offset: params.offset,
        }
    }
}
