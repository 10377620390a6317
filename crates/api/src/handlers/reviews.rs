//! Handlers for `/titles/{title_id}/reviews`.
//!
//! The author and the title are taken from the request context, never from
//! the payload. Reviews are always resolved within their title.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{author_or_staff, Verb, PERMISSION_DENIED_MESSAGE};
use yamdb_core::types::DbId;
use yamdb_core::validators::{validate_score, FEEDBACK_TEXT_MAX_LENGTH};
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppResult, DUPLICATE_REVIEW_MESSAGE};
use crate::extract::{UncheckedJson, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::Paginated;
use crate::state::AppState;

/// Request body for `POST /titles/{title_id}/reviews`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = FEEDBACK_TEXT_MAX_LENGTH))]
    pub text: String,
    #[validate(custom(function = "validate_score"))]
    pub score: i32,
}

/// Request body for `PATCH /titles/{title_id}/reviews/{review_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, max = FEEDBACK_TEXT_MAX_LENGTH))]
    pub text: Option<String>,
    #[validate(custom(function = "validate_score"))]
    pub score: Option<i32>,
}

/// 404 unless the title exists.
pub(crate) async fn ensure_title(pool: &DbPool, title_id: DbId) -> AppResult<()> {
    if !TitleRepo::exists(pool, title_id).await? {
        return Err(CoreError::not_found("Title", title_id).into());
    }
    Ok(())
}

/// Load a review of the given title, 404 if either is missing or they do
/// not belong together.
pub(crate) async fn load_review(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    ensure_title(pool, title_id).await?;
    ReviewRepo::find_in_title(pool, title_id, review_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id).into())
}

/// 403 unless `user` may change content written by `author_id`.
pub(crate) fn check_author_or_staff(
    user: &AuthUser,
    verb: Verb,
    author_id: DbId,
) -> AppResult<()> {
    if !author_or_staff(Some(&user.actor()), verb, author_id) {
        return Err(CoreError::Forbidden(PERMISSION_DENIED_MESSAGE.into()).into());
    }
    Ok(())
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Review>>> {
    ensure_title(&state.pool, title_id).await?;
    let reviews =
        ReviewRepo::list_for_title(&state.pool, title_id, params.limit, params.offset).await?;
    let count = ReviewRepo::count_for_title(&state.pool, title_id).await?;
    Ok(Json(Paginated::new(count, reviews)))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// One review per title and author: checked up front for a clear message,
/// and again by the `uq_reviews_title_author` constraint.
pub async fn create_review(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(title_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    ensure_title(&state.pool, title_id).await?;

    let author_id = caller.user.id;
    if ReviewRepo::exists_for_author(&state.pool, title_id, author_id).await? {
        return Err(CoreError::Conflict(DUPLICATE_REVIEW_MESSAGE.into()).into());
    }

    let dto = CreateReview {
        title_id,
        author_id,
        text: input.text,
        score: input.score,
    };
    let review = ReviewRepo::create(&state.pool, &dto).await?;

    tracing::info!(
        user_id = author_id,
        title_id,
        review_id = review.id,
        score = review.score,
        "Review created"
    );

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    Ok(Json(load_review(&state.pool, title_id, review_id).await?))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
///
/// Field rules run after the author check, so a caller without rights gets
/// 403 whatever the payload.
pub async fn update_review(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    body: UncheckedJson<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = load_review(&state.pool, title_id, review_id).await?;
    check_author_or_staff(&caller, Verb::Patch, review.author_id)?;
    let input = body.validated()?;

    let dto = UpdateReview {
        text: input.text,
        score: input.score,
    };
    let updated = ReviewRepo::update(&state.pool, review.id, &dto)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id))?;

    tracing::info!(user_id = caller.user.id, review_id, "Review updated");

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete_review(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = load_review(&state.pool, title_id, review_id).await?;
    check_author_or_staff(&caller, Verb::Delete, review.author_id)?;

    ReviewRepo::delete(&state.pool, review.id).await?;

    tracing::info!(user_id = caller.user.id, review_id, "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds() {
        for score in [1, 5, 10] {
            let request = CreateReviewRequest {
                text: "Fine".to_string(),
                score,
            };
            assert!(request.validate().is_ok(), "{score}");
        }
        for score in [0, -1, 11, 100] {
            let request = CreateReviewRequest {
                text: "Fine".to_string(),
                score,
            };
            let errors = request.validate().unwrap_err();
            assert!(
                errors.field_errors().keys().any(|k| k.to_string() == "score"),
                "{score}"
            );
        }
    }

    #[test]
    fn update_checks_score_when_present() {
        let request = UpdateReviewRequest {
            text: None,
            score: Some(11),
        };
        assert!(request.validate().is_err());

        let text_only = UpdateReviewRequest {
            text: Some("Changed my mind".to_string()),
            score: None,
        };
        assert!(text_only.validate().is_ok());
    }
}
