//! Out-of-band delivery of signup confirmation codes.
//!
//! With `SMTP_HOST` configured, codes are sent through the `lettre` async SMTP
//! transport. Without it, [`Mailer::Log`] writes the code to the log, which is
//! enough for local development and tests.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@yamdb.local";

const CONFIRMATION_SUBJECT: &str = "YaMDb confirmation code";

/// Configuration for SMTP delivery.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable         | Required | Default               |
    /// |------------------|----------|-----------------------|
    /// | `SMTP_HOST`      | yes      | --                    |
    /// | `SMTP_PORT`      | no       | `587`                 |
    /// | `SMTP_FROM`      | no       | `noreply@yamdb.local` |
    /// | `SMTP_USER`      | no       | --                    |
    /// | `SMTP_PASSWORD`  | no       | --                    |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Delivers confirmation codes to newly registered users.
#[derive(Debug, Clone)]
pub enum Mailer {
    Smtp(EmailConfig),
    /// Writes the message to the log instead of sending it.
    Log,
}

impl Mailer {
    /// SMTP delivery when configured, the log otherwise.
    pub fn from_env() -> Self {
        match EmailConfig::from_env() {
            Some(config) => Mailer::Smtp(config),
            None => Mailer::Log,
        }
    }

    /// Short name of the delivery backend.
    pub fn backend(&self) -> &'static str {
        match self {
            Mailer::Smtp(_) => "smtp",
            Mailer::Log => "log",
        }
    }

    /// Send `code` to `to_email`.
    pub async fn send_confirmation_code(
        &self,
        to_email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), MailError> {
        let body = confirmation_body(username, code);

        let config = match self {
            Mailer::Smtp(config) => config,
            Mailer::Log => {
                tracing::info!(to = to_email, username, code, "Confirmation code (log mailer)");
                return Ok(());
            }
        };

        let email = Message::builder()
            .from(config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(CONFIRMATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport_builder.build().send(email).await?;

        tracing::info!(to = to_email, username, "Confirmation email sent");
        Ok(())
    }
}

fn confirmation_body(username: &str, code: &str) -> String {
    format!(
        "Hello, {username}!\n\n\
         Your confirmation code: {code}\n\n\
         Exchange it for an access token at /api/v1/auth/token/."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_contains_code() {
        let body = confirmation_body("bob", "abc-123");
        assert!(body.contains("bob"));
        assert!(body.contains("abc-123"));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        Mailer::Log
            .send_confirmation_code("not even an address", "bob", "abc-123")
            .await
            .expect("log delivery cannot fail");
    }

    #[test]
    fn backend_names() {
        assert_eq!(Mailer::Log.backend(), "log");
    }

    #[test]
    fn mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn mail_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = MailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
