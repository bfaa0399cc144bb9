//! Client state stores
//!
//! State lives behind `Arc<parking_lot::RwLock<_>>`. Locks are never held
//! across an `.await`; methods read what they need, perform I/O, then write.

mod chat;
mod guard;
mod session;

pub use chat::{ChatState, ChatStore};
pub use session::{SessionState, SessionStore};
