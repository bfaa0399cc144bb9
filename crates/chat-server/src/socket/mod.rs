//! WebSocket presence and push delivery

mod handler;
mod manager;

pub use handler::{socket_handler, SocketParams};
pub use manager::{Connection, ConnectionManager};
