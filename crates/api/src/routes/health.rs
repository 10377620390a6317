//! Liveness endpoint mounted at `/health`, outside `/api/v1`.
//!
//! Signup cannot complete without both the database and a way to deliver
//! confirmation codes, so the report names both.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Where confirmation codes go: `smtp` or `log`.
    pub mail_backend: &'static str,
}

impl HealthReport {
    fn new(db_healthy: bool, mail_backend: &'static str) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            mail_backend,
        }
    }
}

async fn report(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = match yamdb_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check: database unreachable");
            false
        }
    };
    Json(HealthReport::new(db_healthy, state.mailer.backend()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
