pub mod auth;
pub mod classifiers;
pub mod health;
pub mod titles;
pub mod users;

use axum::Router;
use yamdb_core::catalog::ClassifierKind;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                      register, mail code (public)
/// /auth/token                                       exchange code for JWT (public)
///
/// /categories                                       list, create (admin)
/// /categories/{slug}                                delete (admin)
/// /genres                                           list, create (admin)
/// /genres/{slug}                                    delete (admin)
///
/// /titles                                           list, create (admin)
/// /titles/{id}                                      get, update, delete (admin)
/// /titles/{title_id}/reviews                        list, create (auth)
/// /titles/{title_id}/reviews/{review_id}            get, update, delete (author/staff)
/// /titles/{title_id}/reviews/{review_id}/comments   list, create (auth)
/// /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
///                                                   get, update, delete (author/staff)
///
/// /users                                            list, create (admin)
/// /users/me                                         get, update own profile (auth)
/// /users/{username}                                 get, update, delete (admin)
/// ```
///
/// Trailing slashes are trimmed before routing (see
/// [`crate::router::build_app`]).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(classifiers::router(ClassifierKind::Category))
        .merge(classifiers::router(ClassifierKind::Genre))
        .merge(titles::router())
        .merge(users::router())
}
