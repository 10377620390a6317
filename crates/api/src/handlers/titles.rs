//! Handlers for the `/titles` resource.
//!
//! Writes reference the category and genres by slug; reads return them
//! expanded, together with the rating derived from review scores.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::catalog::ClassifierKind;
use yamdb_core::error::CoreError;
use yamdb_core::types::DbId;
use yamdb_core::validators::{validate_year, TITLE_NAME_MAX_LENGTH};
use yamdb_db::models::title::{CreateTitle, TitleFilter, TitleResponse, UpdateTitle};
use yamdb_db::repositories::{ClassifierRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::rbac::RequireCatalogAdmin;
use crate::query::TitleFilterParams;
use crate::response::Paginated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitleRequest {
    #[validate(length(min = 1, max = TITLE_NAME_MAX_LENGTH))]
    pub name: String,
    #[validate(custom(function = "validate_year"))]
    pub year: i32,
    pub description: Option<String>,
    /// Genre slugs; the list itself is required but may be empty.
    pub genre: Vec<String>,
    /// Category slug.
    pub category: String,
}

/// Request body for `PATCH /titles/{id}`. `genre`, when present, replaces
/// the whole set.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[validate(length(min = 1, max = TITLE_NAME_MAX_LENGTH))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_year"))]
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Slug resolution
// ---------------------------------------------------------------------------

fn unknown_slug(kind: ClassifierKind, slug: &str) -> AppError {
    AppError::field(
        kind.title_field(),
        format!("{} with slug '{slug}' does not exist.", kind.label()),
    )
}

async fn resolve_category(pool: &DbPool, slug: Option<&str>) -> AppResult<Option<DbId>> {
    let Some(slug) = slug else {
        return Ok(None);
    };
    let category = ClassifierRepo::find_by_slug(pool, ClassifierKind::Category, slug)
        .await?
        .ok_or_else(|| unknown_slug(ClassifierKind::Category, slug))?;
    Ok(Some(category.id))
}

async fn resolve_genres(pool: &DbPool, slugs: &[String]) -> AppResult<Vec<DbId>> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }
    let genres = ClassifierRepo::find_by_slugs(pool, ClassifierKind::Genre, slugs).await?;
    if let Some(missing) = slugs.iter().find(|s| !genres.iter().any(|g| &g.slug == *s)) {
        return Err(unknown_slug(ClassifierKind::Genre, missing));
    }
    Ok(genres.into_iter().map(|g| g.id).collect())
}

async fn load_response(pool: &DbPool, id: DbId) -> AppResult<TitleResponse> {
    TitleRepo::find_details(pool, id)
        .await?
        .map(TitleResponse::from)
        .ok_or_else(|| CoreError::not_found("Title", id).into())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles?category=&genre=&name=&year=
pub async fn list_titles(
    State(state): State<AppState>,
    Query(params): Query<TitleFilterParams>,
) -> AppResult<Json<Paginated<TitleResponse>>> {
    let filter = TitleFilter::from(params);
    let titles = TitleRepo::list_details(&state.pool, &filter).await?;
    let count = TitleRepo::count(&state.pool, &filter).await?;
    Ok(Json(Paginated::new(
        count,
        titles.into_iter().map(TitleResponse::from).collect(),
    )))
}

/// POST /api/v1/titles
pub async fn create_title(
    State(state): State<AppState>,
    RequireCatalogAdmin(admin): RequireCatalogAdmin,
    ValidJson(input): ValidJson<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    let category_id = resolve_category(&state.pool, Some(input.category.as_str())).await?;
    let genre_ids = resolve_genres(&state.pool, &input.genre).await?;

    let dto = CreateTitle {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
        genre_ids,
    };
    let title = TitleRepo::create(&state.pool, &dto).await?;

    tracing::info!(user_id = admin.user.id, title_id = title.id, "Title created");

    let response = load_response(&state.pool, title.id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/titles/{id}
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TitleResponse>> {
    Ok(Json(load_response(&state.pool, id).await?))
}

/// PATCH /api/v1/titles/{id}
pub async fn update_title(
    State(state): State<AppState>,
    RequireCatalogAdmin(admin): RequireCatalogAdmin,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateTitleRequest>,
) -> AppResult<Json<TitleResponse>> {
    let category_id = resolve_category(&state.pool, input.category.as_deref()).await?;
    let genre_ids = match &input.genre {
        Some(slugs) => Some(resolve_genres(&state.pool, slugs).await?),
        None => None,
    };

    let dto = UpdateTitle {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
        genre_ids,
    };
    TitleRepo::update(&state.pool, id, &dto)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id))?;

    tracing::info!(user_id = admin.user.id, title_id = id, "Title updated");

    Ok(Json(load_response(&state.pool, id).await?))
}

/// DELETE /api/v1/titles/{id}
pub async fn delete_title(
    State(state): State<AppState>,
    RequireCatalogAdmin(admin): RequireCatalogAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TitleRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("Title", id).into());
    }

    tracing::info!(user_id = admin.user.id, title_id = id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn future_year_is_rejected() {
        let next_year = chrono::Utc::now().year() + 1;
        let request = CreateTitleRequest {
            name: "Tomorrow".to_string(),
            year: next_year,
            description: None,
            genre: vec![],
            category: "films".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().keys().any(|k| k.to_string() == "year"));
    }

    #[test]
    fn create_requires_category_and_genre() {
        let missing_category: Result<CreateTitleRequest, _> = serde_json::from_value(
            serde_json::json!({ "name": "Solaris", "year": 1972, "genre": [] }),
        );
        assert!(missing_category.is_err());

        let missing_genre: Result<CreateTitleRequest, _> = serde_json::from_value(
            serde_json::json!({ "name": "Solaris", "year": 1972, "category": "films" }),
        );
        assert!(missing_genre.is_err());
    }

    #[test]
    fn partial_update_validates_present_fields_only() {
        let request = UpdateTitleRequest {
            name: None,
            year: Some(1972),
            description: None,
            genre: None,
            category: None,
        };
        assert!(request.validate().is_ok());

        let blank_name = UpdateTitleRequest {
            name: Some(String::new()),
            year: None,
            description: None,
            genre: None,
            category: None,
        };
        assert!(blank_name.validate().is_err());
    }
}
