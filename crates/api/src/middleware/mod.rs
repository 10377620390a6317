//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The caller behind a JWT Bearer token (401 without one).
//! - [`auth::MaybeAuthUser`] -- Same, but anonymous callers are allowed.
//! - [`rbac::RequireAdmin`] -- Administrator capability (user management).
//! - [`rbac::RequireCatalogAdmin`] -- Catalog writes (always 403 when denied).
//! - [`rbac::RequireAuth`] -- Any authenticated caller.

pub mod auth;
pub mod rbac;
