//! Business logic behind the REST endpoints

mod auth;
mod context;
mod message;

pub use auth::{AuthService, AuthSession};
pub use context::{ServiceContext, ServiceContextBuilder, ServiceContextError};
pub use message::MessageService;
