//! Connection manager
//!
//! Tracks open sockets by session ID and by user, so the server can push a
//! `newMessage` to every tab of a receiver and broadcast the presence set.

use chat_core::{ServerEvent, Snowflake};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One open socket
#[derive(Debug, Clone)]
pub struct Connection {
    session_id: String,
    user_id: Option<Snowflake>,
    sender: mpsc::Sender<ServerEvent>,
}

impl Connection {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The user this socket announced, if it announced a valid one
    pub fn user_id(&self) -> Option<Snowflake> {
        self.user_id
    }

    /// Queue an event for this socket
    ///
    /// # Errors
    /// Fails when the socket's writer has gone away
    pub async fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event).await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Registry of all open sockets
pub struct ConnectionManager {
    /// Open connections by session ID
    connections: DashMap<String, Connection>,

    /// User ID to session IDs; a user is online while this set is non-empty
    user_connections: DashMap<Snowflake, HashSet<String>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a socket; anonymous sockets receive broadcasts but do not count as online
    pub fn add_connection(
        &self,
        session_id: String,
        user_id: Option<Snowflake>,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Connection {
        let connection = Connection {
            session_id: session_id.clone(),
            user_id,
            sender,
        };
        self.connections.insert(session_id.clone(), connection.clone());

        if let Some(user_id) = user_id {
            self.user_connections
                .entry(user_id)
                .or_default()
                .insert(session_id.clone());
        }

        tracing::debug!(session_id = %session_id, user_id = ?user_id, "Connection added");
        connection
    }

    /// Remove a socket, returning its user when one was attached
    pub fn remove_connection(&self, session_id: &str) -> Option<Snowflake> {
        let (_, connection) = self.connections.remove(session_id)?;

        if let Some(user_id) = connection.user_id {
            // Drop the user entry together with its last session
            self.user_connections
                .remove_if_mut(&user_id, |_, sessions| {
                    sessions.remove(session_id);
                    sessions.is_empty()
                });
        }

        tracing::debug!(session_id = %session_id, "Connection removed");
        connection.user_id
    }

    /// Currently online users, ascending by ID
    pub fn online_users(&self) -> Vec<Snowflake> {
        let mut users: Vec<Snowflake> = self.user_connections.iter().map(|r| *r.key()).collect();
        users.sort_unstable();
        users
    }

    pub fn is_online(&self, user_id: Snowflake) -> bool {
        self.user_connections.contains_key(&user_id)
    }

    /// Get all connections for a user
    pub fn get_user_connections(&self, user_id: Snowflake) -> Vec<Connection> {
        self.user_connections
            .get(&user_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Send an event to every connection of a user
    pub async fn send_to_user(&self, user_id: Snowflake, event: ServerEvent) -> usize {
        let connections = self.get_user_connections(user_id);
        let mut sent = 0;

        for conn in connections {
            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(user_id = %user_id, sent = sent, "Event sent to user connections");
        sent
    }

    /// Send an event to every open connection
    pub async fn broadcast(&self, event: ServerEvent) -> usize {
        // Snapshot first; shard guards must not be held across awaits
        let connections: Vec<Connection> = self.connections.iter().map(|r| r.clone()).collect();
        let mut sent = 0;

        for conn in connections {
            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::debug!(event = %event.kind(), sent = sent, "Event broadcast to all connections");
        sent
    }

    /// Push the full presence set to everyone
    pub async fn broadcast_online_users(&self) -> usize {
        self.broadcast(ServerEvent::GetOnlineUsers(self.online_users()))
            .await
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of distinct online users
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .finish()
    }
}
