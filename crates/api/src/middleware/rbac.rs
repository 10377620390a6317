//! Role-based access control (RBAC) extractors.
//!
//! Each extractor resolves the caller and evaluates one of the predicates in
//! [`yamdb_core::permissions`] against the request method, rejecting the
//! request when the predicate denies it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Method;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{
    admin_only, admin_or_read_only, authenticated_or_read_only, Verb, ADMIN_REQUIRED_MESSAGE,
    CREDENTIALS_MISSING_MESSAGE, PERMISSION_DENIED_MESSAGE,
};

use super::auth::{AuthUser, MaybeAuthUser};
use crate::error::AppError;
use crate::state::AppState;

/// Map an HTTP method onto the verbs the permission predicates understand.
pub fn verb_of(method: &Method) -> Verb {
    match *method {
        Method::GET => Verb::Get,
        Method::HEAD => Verb::Head,
        Method::OPTIONS => Verb::Options,
        Method::POST => Verb::Post,
        Method::PUT => Verb::Put,
        Method::PATCH => Verb::Patch,
        Method::DELETE => Verb::Delete,
        _ => Verb::Other,
    }
}

fn forbidden(message: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(message.into()))
}

/// Requires administrator capability (admin role, staff or superuser).
/// 401 without credentials, 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an administrator here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !admin_only(Some(&user.actor())) {
            return Err(forbidden(PERMISSION_DENIED_MESSAGE));
        }
        Ok(RequireAdmin(user))
    }
}

/// Guards catalog writes (categories, genres, titles).
///
/// Denials are 403 for anonymous callers as well, with the "admin rights"
/// message.
pub struct RequireCatalogAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireCatalogAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = MaybeAuthUser::from_request_parts(parts, state).await?;
        if !admin_or_read_only(caller.actor().as_ref(), verb_of(&parts.method)) {
            return Err(forbidden(ADMIN_REQUIRED_MESSAGE));
        }
        caller
            .0
            .map(RequireCatalogAdmin)
            .ok_or_else(|| forbidden(ADMIN_REQUIRED_MESSAGE))
    }
}

/// Requires any authenticated caller. Rejects with 401 otherwise.
///
/// Used for creating reviews and comments; changes to existing ones are
/// further checked against the author in the handlers.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = MaybeAuthUser::from_request_parts(parts, state).await?;
        if !authenticated_or_read_only(caller.actor().as_ref(), verb_of(&parts.method)) {
            return Err(AppError::Core(CoreError::Unauthorized(
                CREDENTIALS_MISSING_MESSAGE.into(),
            )));
        }
        caller.0.map(RequireAuth).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(CREDENTIALS_MISSING_MESSAGE.into()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_to_verbs() {
        assert_eq!(verb_of(&Method::GET), Verb::Get);
        assert_eq!(verb_of(&Method::PATCH), Verb::Patch);
        assert_eq!(verb_of(&Method::DELETE), Verb::Delete);
        assert_eq!(verb_of(&Method::TRACE), Verb::Other);
        assert!(verb_of(&Method::OPTIONS).is_safe());
        assert!(!verb_of(&Method::POST).is_safe());
    }
}
