//! Axum extractors for request handling

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, SESSION_COOKIE};
pub use path::UserIdPath;
pub use validated::{JsonBody, ValidatedJson};
