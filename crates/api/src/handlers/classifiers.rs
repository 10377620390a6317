//! Handlers for `/categories` and `/genres`.
//!
//! Both collections share these handlers; the router of each collection
//! injects its [`ClassifierKind`] as an [`Extension`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use validator::Validate;
use yamdb_core::catalog::ClassifierKind;
use yamdb_core::error::CoreError;
use yamdb_core::validators::{validate_slug, CLASSIFIER_NAME_MAX_LENGTH, SLUG_MAX_LENGTH};
use yamdb_db::models::classifier::{Classifier, ClassifierListParams, CreateClassifier};
use yamdb_db::repositories::ClassifierRepo;

use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::middleware::rbac::RequireCatalogAdmin;
use crate::query::SearchParams;
use crate::response::Paginated;
use crate::state::AppState;

/// Request body for `POST /categories` and `POST /genres`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassifierRequest {
    #[validate(length(min = 1, max = CLASSIFIER_NAME_MAX_LENGTH))]
    pub name: String,
    #[validate(length(min = 1, max = SLUG_MAX_LENGTH), custom(function = "validate_slug"))]
    pub slug: String,
}

/// GET /api/v1/{categories,genres}?search=
pub async fn list(
    State(state): State<AppState>,
    Extension(kind): Extension<ClassifierKind>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Paginated<Classifier>>> {
    let params = ClassifierListParams::from(params);
    let results = ClassifierRepo::list(&state.pool, kind, &params).await?;
    let count = ClassifierRepo::count(&state.pool, kind, &params).await?;
    Ok(Json(Paginated::new(count, results)))
}

/// POST /api/v1/{categories,genres}
pub async fn create(
    State(state): State<AppState>,
    Extension(kind): Extension<ClassifierKind>,
    RequireCatalogAdmin(admin): RequireCatalogAdmin,
    ValidJson(input): ValidJson<CreateClassifierRequest>,
) -> AppResult<(StatusCode, Json<Classifier>)> {
    let dto = CreateClassifier {
        name: input.name,
        slug: input.slug,
    };
    let created = ClassifierRepo::create(&state.pool, kind, &dto).await?;

    tracing::info!(
        user_id = admin.user.id,
        kind = %kind,
        slug = %created.slug,
        "Classifier created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/v1/{categories,genres}/{slug}
pub async fn delete(
    State(state): State<AppState>,
    Extension(kind): Extension<ClassifierKind>,
    RequireCatalogAdmin(admin): RequireCatalogAdmin,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    if !ClassifierRepo::delete_by_slug(&state.pool, kind, &slug).await? {
        return Err(CoreError::not_found(kind.label(), slug).into());
    }

    tracing::info!(user_id = admin.user.id, kind = %kind, slug = %slug, "Classifier deleted");

    Ok(StatusCode::NO_CONTENT)
}
