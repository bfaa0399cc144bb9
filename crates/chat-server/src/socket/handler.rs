//! WebSocket handler
//!
//! A client connects with `?userId=<id>`; the server only pushes. Every
//! connect and disconnect re-broadcasts the presence set.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use chat_core::{ServerEvent, Snowflake};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::state::AppState;

/// Channel buffer size for outgoing events
const EVENT_BUFFER_SIZE: usize = 64;

/// Handshake query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SocketParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl SocketParams {
    /// The announced user, if the value parses as an ID
    pub fn user_id(&self) -> Option<Snowflake> {
        self.user_id
            .as_deref()
            .and_then(|raw| Snowflake::parse(raw).ok())
            .filter(|id| !id.is_zero())
    }
}

/// GET /socket
pub async fn socket_handler(
    State(state): State<AppState>,
    Query(params): Query<SocketParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let user_id = params.user_id();
    if user_id.is_none() {
        tracing::debug!(raw = ?params.user_id, "Socket connected without a usable userId");
    }
    ws.on_upgrade(move |socket| handle_socket(state, socket, user_id))
}

/// Drive an upgraded socket until either side goes away
async fn handle_socket(state: AppState, socket: WebSocket, user_id: Option<Snowflake>) {
    let session_id = Uuid::new_v4().to_string();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(EVENT_BUFFER_SIZE);

    let connections = state.connections();
    connections.add_connection(session_id.clone(), user_id, tx);

    tracing::info!(session_id = %session_id, user_id = ?user_id, "A user connected");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Forward queued events to the socket
    let session_id_send = session_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match event.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode socket event");
                    continue;
                }
            };
            if ws_sink.send(Message::Text(json)).await.is_err() {
                tracing::warn!(session_id = %session_id_send, "Failed to write to socket");
                break;
            }
        }

        let _ = ws_sink.close().await;
    });

    // Clients do not emit events; read only to notice the close
    let session_id_recv = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!(session_id = %session_id_recv, "Client closed connection");
                    break;
                }
                Ok(Message::Text(text)) => {
                    tracing::trace!(session_id = %session_id_recv, len = text.len(), "Ignoring client frame");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(session_id = %session_id_recv, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    // Announce after the writer is running so the new socket gets the set too
    connections.broadcast_online_users().await;

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    }

    connections.remove_connection(&session_id);
    tracing::info!(session_id = %session_id, user_id = ?user_id, "A user disconnected");

    connections.broadcast_online_users().await;
}
