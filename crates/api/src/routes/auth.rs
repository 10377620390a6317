use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Public signup and token routes.
///
/// ```text
/// POST /auth/signup    -> signup
/// POST /auth/token     -> obtain_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/token", post(auth::obtain_token))
}
