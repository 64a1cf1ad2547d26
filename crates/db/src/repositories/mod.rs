//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod character_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;
pub mod vote_repo;

pub use character_repo::CharacterRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use vote_repo::VoteRepo;
