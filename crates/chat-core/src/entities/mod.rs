//! Domain entities - core business objects

mod message;
mod user;

pub use message::Message;
pub use user::User;
