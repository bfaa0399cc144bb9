//! # chat-core
//!
//! Domain layer shared by the chat client and server: identifiers, users,
//! messages, request payloads, socket events, and repository traits.
//! This crate has no dependencies on infrastructure (HTTP, sockets, storage).

pub mod dto;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use dto::{LoginRequest, SendMessageRequest, SignupRequest, UpdateProfileRequest, REQUIRED};
pub use entities::{Message, User};
pub use error::DomainError;
pub use events::{EventKind, ServerEvent};
pub use traits::{MessageRepository, RepoResult, UserRepository};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
