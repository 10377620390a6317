//! Routes shared by `/categories` and `/genres`.

use axum::routing::{delete, get};
use axum::{Extension, Router};
use yamdb_core::catalog::ClassifierKind;

use crate::handlers::classifiers;
use crate::state::AppState;

/// Collection path of each classifier kind.
const fn collection_path(kind: ClassifierKind) -> &'static str {
    match kind {
        ClassifierKind::Category => "/categories",
        ClassifierKind::Genre => "/genres",
    }
}

/// Routes for one classifier collection.
///
/// ```text
/// GET    /{collection}            -> list
/// POST   /{collection}            -> create (admin)
/// DELETE /{collection}/{slug}     -> delete (admin)
/// ```
pub fn router(kind: ClassifierKind) -> Router<AppState> {
    let base = collection_path(kind);
    Router::new()
        .route(base, get(classifiers::list).post(classifiers::create))
        .route(&format!("{base}/{{slug}}"), delete(classifiers::delete))
        .layer(Extension(kind))
}
