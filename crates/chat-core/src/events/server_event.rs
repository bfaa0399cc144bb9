//! Server-to-client socket events
//!
//! Every frame on the socket is a JSON object `{"event": <name>, "data": <payload>}`.
//! Clients never emit events; the handshake query carries their identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Message;
use crate::value_objects::Snowflake;

/// Event pushed by the server over the socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full set of currently connected user IDs (replaces any previous set)
    #[serde(rename = "getOnlineUsers")]
    GetOnlineUsers(Vec<Snowflake>),

    /// A message addressed to the connected user
    #[serde(rename = "newMessage")]
    NewMessage(Message),
}

impl ServerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::GetOnlineUsers(_) => EventKind::GetOnlineUsers,
            Self::NewMessage(_) => EventKind::NewMessage,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Event name, used to register and remove listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GetOnlineUsers,
    NewMessage,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetOnlineUsers => "getOnlineUsers",
            Self::NewMessage => "newMessage",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
