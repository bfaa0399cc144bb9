//! Repository traits (ports) - the data access the server needs
//!
//! The domain layer defines what it needs; the server provides an
//! implementation. Only an in-memory implementation ships with this
//! workspace.

use async_trait::async_trait;

use crate::entities::{Message, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Email lookup is case-insensitive
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a user; fails with `EmailAlreadyExists` on a duplicate email
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    async fn update(&self, user: &User) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// All users except `id`, oldest account first
    async fn list_except(&self, id: Snowflake) -> RepoResult<Vec<User>>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Both directions of the conversation between `a` and `b`, in creation order
    async fn find_conversation(&self, a: Snowflake, b: Snowflake) -> RepoResult<Vec<Message>>;
}
