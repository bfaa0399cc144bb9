//! Repository implementations

mod memory;

pub use memory::{MemoryMessageRepository, MemoryUserRepository};
