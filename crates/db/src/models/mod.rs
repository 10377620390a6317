//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Serialize` response shape where the row is not exposed directly
//! - Create / update DTOs consumed by the repositories

pub mod classifier;
pub mod comment;
pub mod review;
pub mod title;
pub mod user;
