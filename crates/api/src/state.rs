use std::sync::Arc;

use yamdb_core::confirmation::ConfirmationCodes;

use crate::config::ServerConfig;
use crate::mail::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yamdb_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Issues and checks signup confirmation codes.
    pub codes: Arc<ConfirmationCodes>,
    /// Delivers confirmation codes.
    pub mailer: Arc<Mailer>,
}

impl AppState {
    pub fn new(pool: yamdb_db::DbPool, config: ServerConfig, mailer: Mailer) -> Self {
        let codes = ConfirmationCodes::new(
            config.confirmation.secret.clone(),
            config.confirmation.timeout_secs,
        );
        Self {
            pool,
            config: Arc::new(config),
            codes: Arc::new(codes),
            mailer: Arc::new(mailer),
        }
    }
}
