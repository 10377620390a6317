use yamdb_core::confirmation::DEFAULT_TIMEOUT_SECS;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    pub confirmation: ConfirmationConfig,
    /// Account promoted to administrator at startup, if configured.
    pub superuser: Option<SuperuserConfig>,
}

/// Signing parameters for signup confirmation codes.
#[derive(Clone)]
pub struct ConfirmationConfig {
    pub secret: String,
    pub timeout_secs: i64,
}

impl std::fmt::Debug for ConfirmationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationConfig")
            .field("secret", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Bootstrap administrator account.
#[derive(Debug, Clone)]
pub struct SuperuserConfig {
    pub username: String,
    pub email: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                 |
    /// |----------------------------------|-------------------------|
    /// | `HOST`                           | `0.0.0.0`               |
    /// | `PORT`                           | `3000`                  |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                    |
    /// | `CONFIRMATION_CODE_SECRET`       | value of `JWT_SECRET`   |
    /// | `CONFIRMATION_CODE_TIMEOUT_SECS` | `259200` (3 days)       |
    /// | `SUPERUSER_USERNAME`             | --                      |
    /// | `SUPERUSER_EMAIL`                | --                      |
    ///
    /// See [`JwtConfig::from_env`] for the JWT variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let confirmation = ConfirmationConfig {
            secret: std::env::var("CONFIRMATION_CODE_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| jwt.secret.clone()),
            timeout_secs: std::env::var("CONFIRMATION_CODE_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .expect("CONFIRMATION_CODE_TIMEOUT_SECS must be a valid i64"),
        };

        let superuser = match (
            std::env::var("SUPERUSER_USERNAME"),
            std::env::var("SUPERUSER_EMAIL"),
        ) {
            (Ok(username), Ok(email)) if !username.is_empty() && !email.is_empty() => {
                Some(SuperuserConfig { username, email })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            confirmation,
            superuser,
        }
    }
}
