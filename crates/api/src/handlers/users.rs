//! Handlers for the `/users` resource.
//!
//! Account management under `/users` and `/users/{username}` requires
//! administrator capability via [`RequireAdmin`]. `/users/me` serves the
//! caller's own profile, where the role is read-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::roles::Role;
use yamdb_core::validators::{
    validate_username, EMAIL_MAX_LENGTH, PERSON_NAME_MAX_LENGTH, USERNAME_MAX_LENGTH,
};
use yamdb_db::models::user::{
    CreateUser, UpdateProfile, UpdateUser, User, UserListParams, UserResponse,
};
use yamdb_db::repositories::UserRepo;
use yamdb_db::DbPool;

use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Paginated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = USERNAME_MAX_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = EMAIL_MAX_LENGTH)
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = PERSON_NAME_MAX_LENGTH))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = PERSON_NAME_MAX_LENGTH))]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub role: Role,
}

/// Request body for `PATCH /users/{username}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = USERNAME_MAX_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = EMAIL_MAX_LENGTH)
    )]
    pub email: Option<String>,
    #[validate(length(max = PERSON_NAME_MAX_LENGTH))]
    pub first_name: Option<String>,
    #[validate(length(max = PERSON_NAME_MAX_LENGTH))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

/// Request body for `PATCH /users/me`.
///
/// There is no `role` field; a role sent by the client is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = USERNAME_MAX_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = EMAIL_MAX_LENGTH)
    )]
    pub email: Option<String>,
    #[validate(length(max = PERSON_NAME_MAX_LENGTH))]
    pub first_name: Option<String>,
    #[validate(length(max = PERSON_NAME_MAX_LENGTH))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

async fn find_user(pool: &DbPool, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(pool, username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", username).into())
}

// ---------------------------------------------------------------------------
// Administrator handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users?search=
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let params = UserListParams::from(params);
    let users = UserRepo::list(&state.pool, &params).await?;
    let count = UserRepo::count(&state.pool, &params).await?;
    Ok(Json(Paginated::new(
        count,
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(input): ValidJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let dto = CreateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: input.role,
    };
    let user = UserRepo::create(&state.pool, &dto).await?;

    tracing::info!(
        user_id = admin.user.id,
        created_user_id = user.id,
        role = %user.role,
        "User created"
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(find_user(&state.pool, &username).await?.into()))
}

/// PATCH /api/v1/users/{username}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(username): Path<String>,
    ValidJson(input): ValidJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let target = find_user(&state.pool, &username).await?;

    let dto = UpdateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: input.role,
    };
    let user = UserRepo::update(&state.pool, target.id, &dto)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;

    tracing::info!(user_id = admin.user.id, target_user_id = user.id, "User updated");

    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{username}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    let target = find_user(&state.pool, &username).await?;
    UserRepo::delete(&state.pool, target.id).await?;

    tracing::info!(user_id = admin.user.id, target_user_id = target.id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self-service handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(caller: AuthUser) -> Json<UserResponse> {
    Json(caller.user.into())
}

/// PATCH /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(input): ValidJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let dto = UpdateProfile {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
    };
    let user = UserRepo::update_profile(&state.pool, caller.user.id, &dto)
        .await?
        .ok_or_else(|| CoreError::not_found("User", caller.user.id))?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(user.into()))
}
