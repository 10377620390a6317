use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User management and the self-service profile.
///
/// `/users/me` is a static segment and takes precedence over the
/// `/users/{username}` capture, which is why `me` is a reserved username.
///
/// ```text
/// GET, POST           /users              (admin)
/// GET, PATCH          /users/me           (auth)
/// GET, PATCH, DELETE  /users/{username}   (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/me", get(users::get_me).patch(users::update_me))
        .route(
            "/users/{username}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}
