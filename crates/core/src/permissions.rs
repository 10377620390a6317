//! Authorization predicates.
//!
//! Each rule is a pure function of the calling [`Actor`] (or `None` for an
//! anonymous request), the request [`Verb`], and, for authored content, the
//! author id. The HTTP layer decides which status a denial maps to.

use crate::roles::Role;
use crate::types::DbId;

/// Message returned when a catalog write is attempted without admin rights.
pub const ADMIN_REQUIRED_MESSAGE: &str = "You must have admin rights to perform this action.";

/// Generic denial message for authored content and user management.
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action.";

/// Message returned when a protected endpoint is called without credentials.
pub const CREDENTIALS_MISSING_MESSAGE: &str = "Authentication credentials were not provided.";

/// The authenticated caller, as loaded from the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Actor {
    /// Administrator capability: the admin role or either elevated flag.
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Admin || self.is_staff || self.is_superuser
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

/// Request method as seen by the predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
    Other,
}

impl Verb {
    /// Safe verbs never mutate state and are open to everyone.
    pub fn is_safe(self) -> bool {
        matches!(self, Verb::Get | Verb::Head | Verb::Options)
    }
}

/// Catalog rule (categories, genres, titles): reads for everyone, writes for
/// authenticated administrators only.
pub fn admin_or_read_only(actor: Option<&Actor>, verb: Verb) -> bool {
    verb.is_safe() || actor.is_some_and(Actor::is_administrator)
}

/// Reads for everyone, writes for any authenticated user.
pub fn authenticated_or_read_only(actor: Option<&Actor>, verb: Verb) -> bool {
    verb.is_safe() || actor.is_some()
}

/// Authored-content rule (reviews, comments): reads for everyone, writes for
/// the author, moderators and administrators.
pub fn author_or_staff(actor: Option<&Actor>, verb: Verb, author_id: DbId) -> bool {
    if verb.is_safe() {
        return true;
    }
    match actor {
        Some(actor) => {
            actor.user_id == author_id || actor.is_administrator() || actor.is_moderator()
        }
        None => false,
    }
}

/// User-management rule: authenticated administrators or superusers.
pub fn admin_only(actor: Option<&Actor>) -> bool {
    actor.is_some_and(|a| a.is_administrator() || a.is_superuser)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSAFE: [Verb; 5] = [Verb::Post, Verb::Put, Verb::Patch, Verb::Delete, Verb::Other];
    const SAFE: [Verb; 3] = [Verb::Get, Verb::Head, Verb::Options];

    fn actor(user_id: DbId, role: Role) -> Actor {
        Actor {
            user_id,
            role,
            is_staff: false,
            is_superuser: false,
        }
    }

    #[test]
    fn administrator_capability() {
        assert!(actor(1, Role::Admin).is_administrator());
        assert!(!actor(1, Role::Moderator).is_administrator());
        assert!(!actor(1, Role::User).is_administrator());

        let staff = Actor {
            is_staff: true,
            ..actor(1, Role::User)
        };
        assert!(staff.is_administrator());

        let superuser = Actor {
            is_superuser: true,
            ..actor(1, Role::User)
        };
        assert!(superuser.is_administrator());
    }

    #[test]
    fn moderator_capability_is_role_only() {
        assert!(actor(1, Role::Moderator).is_moderator());
        assert!(!actor(1, Role::Admin).is_moderator());
    }

    #[test]
    fn safe_verbs_are_open_to_anonymous_callers() {
        for verb in SAFE {
            assert!(admin_or_read_only(None, verb));
            assert!(authenticated_or_read_only(None, verb));
            assert!(author_or_staff(None, verb, 7));
        }
    }

    #[test]
    fn catalog_writes_need_administrator() {
        let admin = actor(1, Role::Admin);
        let moderator = actor(2, Role::Moderator);
        let user = actor(3, Role::User);
        for verb in UNSAFE {
            assert!(admin_or_read_only(Some(&admin), verb));
            assert!(!admin_or_read_only(Some(&moderator), verb));
            assert!(!admin_or_read_only(Some(&user), verb));
            assert!(!admin_or_read_only(None, verb));
        }
    }

    #[test]
    fn authored_content_writes() {
        let author = actor(10, Role::User);
        let stranger = actor(11, Role::User);
        let moderator = actor(12, Role::Moderator);
        let admin = actor(13, Role::Admin);
        for verb in UNSAFE {
            assert!(author_or_staff(Some(&author), verb, 10));
            assert!(!author_or_staff(Some(&stranger), verb, 10));
            assert!(author_or_staff(Some(&moderator), verb, 10));
            assert!(author_or_staff(Some(&admin), verb, 10));
            assert!(!author_or_staff(None, verb, 10));
        }
    }

    #[test]
    fn authenticated_writes() {
        assert!(authenticated_or_read_only(Some(&actor(1, Role::User)), Verb::Post));
        assert!(!authenticated_or_read_only(None, Verb::Post));
    }

    #[test]
    fn user_management_is_admin_only() {
        assert!(admin_only(Some(&actor(1, Role::Admin))));
        assert!(!admin_only(Some(&actor(1, Role::Moderator))));
        assert!(!admin_only(Some(&actor(1, Role::User))));
        assert!(!admin_only(None));

        let superuser = Actor {
            is_superuser: true,
            ..actor(1, Role::User)
        };
        assert!(admin_only(Some(&superuser)));
    }
}
