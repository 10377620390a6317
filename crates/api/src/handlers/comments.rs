//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::Verb;
use yamdb_core::types::DbId;
use yamdb_core::validators::FEEDBACK_TEXT_MAX_LENGTH;
use yamdb_db::models::comment::{Comment, CreateComment, UpdateComment};
use yamdb_db::repositories::CommentRepo;
use yamdb_db::DbPool;

use super::reviews::{check_author_or_staff, load_review};
use crate::error::AppResult;
use crate::extract::{UncheckedJson, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::Paginated;
use crate::state::AppState;

/// Request body for `POST .../comments`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = FEEDBACK_TEXT_MAX_LENGTH))]
    pub text: String,
}

/// Request body for `PATCH .../comments/{comment_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = FEEDBACK_TEXT_MAX_LENGTH))]
    pub text: Option<String>,
}

async fn load_comment(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    load_review(pool, title_id, review_id).await?;
    CommentRepo::find_in_review(pool, review_id, comment_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id).into())
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Comment>>> {
    load_review(&state.pool, title_id, review_id).await?;
    let comments =
        CommentRepo::list_for_review(&state.pool, review_id, params.limit, params.offset).await?;
    let count = CommentRepo::count_for_review(&state.pool, review_id).await?;
    Ok(Json(Paginated::new(count, comments)))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ValidJson(input): ValidJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let review = load_review(&state.pool, title_id, review_id).await?;

    let dto = CreateComment {
        review_id: review.id,
        author_id: caller.user.id,
        text: input.text,
    };
    let comment = CommentRepo::create(&state.pool, &dto).await?;

    tracing::info!(
        user_id = caller.user.id,
        review_id,
        comment_id = comment.id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    Ok(Json(
        load_comment(&state.pool, title_id, review_id, comment_id).await?,
    ))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    body: UncheckedJson<UpdateCommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment = load_comment(&state.pool, title_id, review_id, comment_id).await?;
    check_author_or_staff(&caller, Verb::Patch, comment.author_id)?;
    let input = body.validated()?;

    let dto = UpdateComment { text: input.text };
    let updated = CommentRepo::update(&state.pool, comment.id, &dto)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?;

    tracing::info!(user_id = caller.user.id, comment_id, "Comment updated");

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = load_comment(&state.pool, title_id, review_id, comment_id).await?;
    check_author_or_staff(&caller, Verb::Delete, comment.author_id)?;

    CommentRepo::delete(&state.pool, comment.id).await?;

    tracing::info!(user_id = caller.user.id, comment_id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_without_text_is_valid() {
        let request: UpdateCommentRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(request.text.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn blank_text_is_rejected() {
        let update = UpdateCommentRequest {
            text: Some(String::new()),
        };
        assert!(update.validate().is_err());

        let create = CreateCommentRequest {
            text: String::new(),
        };
        assert!(create.validate().is_err());
    }
}
