//! JSON body extractors with field validation.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// Like [`Json`], but runs the payload's `validator` rules after decoding.
///
/// Malformed bodies are rejected with 400 `BAD_REQUEST`; rule failures with
/// 400 `VALIDATION_ERROR` and per-field messages.
///
/// ```ignore
/// async fn create(ValidJson(input): ValidJson<CreateReviewRequest>) -> AppResult<()> {
///     // input.score is already within range here
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let UncheckedJson(value) = UncheckedJson::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// A decoded JSON body whose `validator` rules have not run yet.
///
/// For handlers that must resolve the target and check object permissions
/// before reporting field errors: call [`UncheckedJson::validated`] once
/// the caller is known to be allowed.
///
/// ```ignore
/// async fn update(caller: AuthUser, body: UncheckedJson<UpdateReviewRequest>) -> AppResult<()> {
///     check_author_or_staff(&caller, Verb::Patch, author_id)?;
///     let input = body.validated()?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UncheckedJson<T>(pub T);

impl<T: Validate> UncheckedJson<T> {
    /// Run the payload's rules, yielding it on success.
    pub fn validated(self) -> Result<T, AppError> {
        self.0.validate()?;
        Ok(self.0)
    }
}

impl<S, T> FromRequest<S> for UncheckedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(UncheckedJson(value))
    }
}
