//! Domain layer for the YaMDb review platform.
//!
//! Everything here is pure: no database access and no HTTP types. The `db`
//! and `api` crates build on these types and predicates.

pub mod catalog;
pub mod confirmation;
pub mod error;
pub mod permissions;
pub mod roles;
pub mod types;
pub mod validators;
