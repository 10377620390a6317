pub mod auth;
pub mod classifiers;
pub mod comments;
pub mod reviews;
pub mod titles;
pub mod users;
