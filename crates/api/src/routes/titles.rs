use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, reviews, titles};
use crate::state::AppState;

/// Titles and the reviews and comments nested under them.
///
/// ```text
/// GET, POST           /titles
/// GET, PATCH, DELETE  /titles/{id}
/// GET, POST           /titles/{title_id}/reviews
/// GET, PATCH, DELETE  /titles/{title_id}/reviews/{review_id}
/// GET, POST           /titles/{title_id}/reviews/{review_id}/comments
/// GET, PATCH, DELETE  /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/titles",
            get(titles::list_titles).post(titles::create_title),
        )
        .route(
            "/titles/{id}",
            get(titles::get_title)
                .patch(titles::update_title)
                .delete(titles::delete_title),
        )
        .route(
            "/titles/{title_id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
}
