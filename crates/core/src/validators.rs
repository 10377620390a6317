//! Field validators shared by request DTOs.
//!
//! Every function returns [`ValidationError`] so it can be plugged into
//! `#[validate(custom(function = ...))]` on a `#[derive(Validate)]` struct.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use validator::ValidationError;

/* --------------------------------------------------------------------------
Length limits
-------------------------------------------------------------------------- */

pub const USERNAME_MAX_LENGTH: u64 = 150;
pub const EMAIL_MAX_LENGTH: u64 = 254;
pub const PERSON_NAME_MAX_LENGTH: u64 = 150;
pub const CLASSIFIER_NAME_MAX_LENGTH: u64 = 256;
pub const SLUG_MAX_LENGTH: u64 = 50;
pub const TITLE_NAME_MAX_LENGTH: u64 = 256;
pub const FEEDBACK_TEXT_MAX_LENGTH: u64 = 10_000;

/// Inclusive review score bounds.
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

/// Username reserved for the self-service profile path (`/users/me`).
pub const RESERVED_USERNAME: &str = "me";

static DISALLOWED_USERNAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w.@+\-]+").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

fn error(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/* --------------------------------------------------------------------------
Validators
-------------------------------------------------------------------------- */

/// Reject release years in the future, relative to the current UTC year.
pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    check_year(year, chrono::Utc::now().year())
}

/// Pure form of [`validate_year`] with an explicit current year.
pub fn check_year(year: i32, current_year: i32) -> Result<(), ValidationError> {
    if year > current_year {
        return Err(error("future_year", format!("Year {year} has not come yet")));
    }
    Ok(())
}

/// Scores are integers on a 1..=10 scale.
pub fn validate_score(score: i32) -> Result<(), ValidationError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(error(
            "score_range",
            format!("Score must be on a scale from {MIN_SCORE} to {MAX_SCORE}"),
        ))
    }
}

/// Usernames may only use word characters and `.@+-`, and must not be `me`
/// in any letter case. The first offending run of characters is reported.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.to_lowercase() == RESERVED_USERNAME {
        return Err(error(
            "reserved_username",
            format!("'{RESERVED_USERNAME}' cannot be used as a username"),
        ));
    }
    if let Some(found) = DISALLOWED_USERNAME_CHARS.find(username) {
        return Err(error(
            "invalid_username",
            format!("'{}' cannot be used in a username", found.as_str()),
        ));
    }
    Ok(())
}

/// Slugs are ASCII letters, digits, hyphens and underscores.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(error(
            "invalid_slug",
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
                .to_string(),
        ))
    }
}
