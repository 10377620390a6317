//! Signup confirmation codes.
//!
//! Codes are never stored. A code is an HMAC-SHA256 over the account state
//! (`id`, `email`, `last_login_at`) and the issue time, so it can be checked
//! later by recomputing it. Stamping `last_login_at` when a code is exchanged
//! changes the account state and invalidates every code issued before.
//!
//! Format: `{issue_ts_base36}-{32 hex chars}` where `issue_ts` counts seconds
//! since 2001-01-01T00:00:00Z.

use std::fmt;

use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::{DbId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// Default validity window: three days.
pub const DEFAULT_TIMEOUT_SECS: i64 = 3 * 24 * 60 * 60;

const KEY_SALT: &str = "yamdb.core.confirmation.ConfirmationCodes";

/// The account state a code is bound to.
#[derive(Debug, Clone, Copy)]
pub struct CodeSubject<'a> {
    pub user_id: DbId,
    pub email: &'a str,
    pub last_login_at: Option<Timestamp>,
}

/// Issues and verifies confirmation codes with a server-side secret.
#[derive(Clone)]
pub struct ConfirmationCodes {
    secret: String,
    timeout_secs: i64,
}

impl fmt::Debug for ConfirmationCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationCodes")
            .field("secret", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ConfirmationCodes {
    pub fn new(secret: impl Into<String>, timeout_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            timeout_secs,
        }
    }

    pub fn timeout_secs(&self) -> i64 {
        self.timeout_secs
    }

    /// Issue a code for `subject` stamped with the current time.
    pub fn make_code(&self, subject: &CodeSubject<'_>) -> String {
        self.make_code_at(subject, Utc::now())
    }

    pub fn make_code_at(&self, subject: &CodeSubject<'_>, now: Timestamp) -> String {
        self.code_for_timestamp(subject, seconds_since_reference(now))
    }

    /// Check a code against the current account state and the current time.
    pub fn check_code(&self, subject: &CodeSubject<'_>, code: &str) -> bool {
        self.check_code_at(subject, code, Utc::now())
    }

    pub fn check_code_at(&self, subject: &CodeSubject<'_>, code: &str, now: Timestamp) -> bool {
        let Some((ts_part, _)) = code.split_once('-') else {
            return false;
        };
        let Ok(issued_at) = i64::from_str_radix(ts_part, 36) else {
            return false;
        };

        let expected = self.code_for_timestamp(subject, issued_at);
        if !constant_time_eq(expected.as_bytes(), code.as_bytes()) {
            return false;
        }

        seconds_since_reference(now) - issued_at <= self.timeout_secs
    }

    fn code_for_timestamp(&self, subject: &CodeSubject<'_>, issued_at: i64) -> String {
        let login_stamp = subject
            .last_login_at
            .map(|t| t.timestamp().to_string())
            .unwrap_or_default();

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(KEY_SALT.as_bytes());
        mac.update(
            format!(
                "{}|{}|{}|{}",
                subject.user_id, subject.email, login_stamp, issued_at
            )
            .as_bytes(),
        );
        let digest = mac.finalize().into_bytes();

        // Every other hex digit keeps the code short (32 chars).
        let hash: String = digest
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>()
            .chars()
            .step_by(2)
            .collect();

        format!("{}-{hash}", to_base36(issued_at))
    }
}

fn seconds_since_reference(now: Timestamp) -> i64 {
    let reference = Utc
        .with_ymd_and_hms(2001, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();
    (now - reference).num_seconds()
}

fn to_base36(mut value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
