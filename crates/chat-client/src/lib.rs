//! # chat-client
//!
//! Client state for the chat application: a session store that owns the
//! socket connection, a chat store for the open conversation, and the HTTP
//! wrapper both use. Rendering is left to the embedding UI, which reads
//! store snapshots and receives notifications.

pub mod app;
pub mod error;
pub mod http;
pub mod notify;
pub mod profile;
pub mod socket;
pub mod stores;

pub use app::ChatApp;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use notify::{ChannelNotifier, Notification, Notifier, TracingNotifier};
pub use profile::{image_data_url, Avatar, ProfileView};
pub use socket::{ListenerRegistry, SocketHandle, SocketManager};
pub use stores::{ChatState, ChatStore, SessionState, SessionStore};
