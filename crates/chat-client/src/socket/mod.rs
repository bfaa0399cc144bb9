//! Socket connection
//!
//! The session store owns a [`SocketManager`] and is the only component that
//! opens or closes the connection. Other stores get a [`SocketHandle`], which
//! can only attach and detach listeners on whatever connection is live.

mod manager;
mod registry;

pub use manager::{SocketHandle, SocketManager};
pub use registry::{Listener, ListenerRegistry};
