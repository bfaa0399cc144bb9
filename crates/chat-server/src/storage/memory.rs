//! In-memory repositories
//!
//! Data lives for the lifetime of the process. Users are keyed by ID with a
//! secondary lowercase-email index; messages are kept in one append-only log.

use async_trait::async_trait;
use chat_core::{DomainError, Message, MessageRepository, RepoResult, Snowflake, User, UserRepository};
use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::RwLock;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// User storage backed by `DashMap`
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: DashMap<Snowflake, StoredUser>,
    emails: DashMap<String, Snowflake>,
}

impl MemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let Some(id) = self.emails.get(&email_key(email)).map(|r| *r) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.emails.contains_key(&email_key(email)))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        // The email index entry is the uniqueness lock
        match self.emails.entry(email_key(&user.email)) {
            Entry::Occupied(_) => return Err(DomainError::EmailAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        self.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut stored = self
            .users
            .get_mut(&user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        stored.user = user.clone();
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.users.get(&id).map(|stored| stored.password_hash.clone()))
    }

    async fn list_except(&self, id: Snowflake) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| *entry.key() != id)
            .map(|entry| entry.user.clone())
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

/// Message log behind a `parking_lot::RwLock`
#[derive(Debug, Default)]
pub struct MemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

impl MemoryMessageRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages.write().push(message.clone());
        Ok(())
    }

    async fn find_conversation(&self, a: Snowflake, b: Snowflake) -> RepoResult<Vec<Message>> {
        let mut conversation: Vec<Message> = self
            .messages
            .read()
            .iter()
            .filter(|m| m.is_between(a, b))
            .cloned()
            .collect();
        // IDs are time-ordered; concurrent sends may land slightly out of order
        conversation.sort_by_key(|m| m.id);
        Ok(conversation)
    }
}
