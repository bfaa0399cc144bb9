//! Client error types

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Shown when the server gave no usable message
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Errors surfaced by the HTTP wrapper and the socket
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the server's `message` field
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Socket error: {0}")]
    Socket(#[from] tungstenite::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No conversation selected")]
    NoConversationSelected,
}

impl ClientError {
    /// Text to put in a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::NoConversationSelected => self.to_string(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// 401 from the server: no session or an invalid one
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }

    /// 400 from the server: the request was rejected as invalid
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Server { status: 400, .. })
    }

    /// The server could not be reached or the connection broke
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Socket(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
