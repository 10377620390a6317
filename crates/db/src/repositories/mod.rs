//! Repository structs providing async CRUD operations.
//!
//! Each repository is a zero-sized struct with static async methods that
//! accept a `&PgPool` as the first parameter.

pub mod classifier_repo;
pub mod comment_repo;
pub mod review_repo;
pub mod title_repo;
pub mod user_repo;

pub use classifier_repo::ClassifierRepo;
pub use comment_repo::CommentRepo;
pub use review_repo::ReviewRepo;
pub use title_repo::TitleRepo;
pub use user_repo::UserRepo;
