//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::confirmation::CodeSubject;
use yamdb_core::permissions::Actor;
use yamdb_core::roles::Role;
use yamdb_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Carries internal flags (`is_staff`, `is_superuser`, `last_login_at`) that
/// are never exposed. Use [`UserResponse`] for API output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl User {
    /// The permission-relevant view of this account.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }

    /// The account state confirmation codes are bound to.
    pub fn code_subject(&self) -> CodeSubject<'_> {
        CodeSubject {
            user_id: self.id,
            email: &self.email,
            last_login_at: self.last_login_at,
        }
    }
}

/// Public user representation.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl CreateUser {
    /// A plain account as created by self-registration.
    pub fn signup(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            ..Self::default()
        }
    }
}

/// DTO for an administrator's update of any account. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

/// DTO for a user's update of their own profile. There is no role field.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserListParams {
    /// Case-insensitive substring match on `username`.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
