//! Integration test utilities
//!
//! Spawns the chat server in-process on an ephemeral port and drives it
//! with raw `reqwest` calls or with the client stores.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
