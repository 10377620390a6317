//! Handlers for the `/auth` resource (signup, token exchange).
//!
//! Accounts have no password. Signup mails a confirmation code derived from
//! the account state; exchanging it yields an access token and stamps the
//! login time, which invalidates every code issued before.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::validators::{validate_username, EMAIL_MAX_LENGTH, USERNAME_MAX_LENGTH};
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::state::AppState;

/// Returned when the username or the email belongs to another account.
pub const SIGNUP_CONFLICT_MESSAGE: &str =
    "Email or username is already taken, choose another one.";

pub const INVALID_CODE_MESSAGE: &str = "Invalid or expired confirmation code.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`, echoed back on success.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SignupRequest {
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
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(
        length(min = 1, max = USERNAME_MAX_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register (or re-register) a username/email pair and mail a fresh
/// confirmation code. Repeating a signup with the same pair is allowed and
/// simply sends a new code.
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SignupRequest>,
) -> AppResult<Json<SignupRequest>> {
    let (user, created) =
        match UserRepo::get_or_create(&state.pool, &input.username, &input.email).await {
            Ok(pair) => pair,
            Err(err) if yamdb_db::unique_violation(&err).is_some() => {
                return Err(CoreError::Conflict(SIGNUP_CONFLICT_MESSAGE.into()).into());
            }
            Err(err) => return Err(err.into()),
        };

    let code = state.codes.make_code(&user.code_subject());
    state
        .mailer
        .send_confirmation_code(&user.email, &user.username, &code)
        .await
        .map_err(|e| AppError::InternalError(format!("Confirmation email error: {e}")))?;

    tracing::info!(user_id = user.id, created, "Confirmation code issued");

    Ok(Json(input))
}

/// POST /api/v1/auth/token
///
/// Exchange a confirmation code for an access token.
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &input.username))?;

    if !state
        .codes
        .check_code(&user.code_subject(), &input.confirmation_code)
    {
        tracing::warn!(user_id = user.id, "Rejected confirmation code");
        return Err(AppError::field("confirmation_code", INVALID_CODE_MESSAGE));
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok(Json(TokenResponse { token }))
}
