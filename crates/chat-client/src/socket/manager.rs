//! Socket connection manager
//!
//! One WebSocket per session, opened with `?userId=<id>`. A spawned reader
//! task decodes `{event, data}` frames and dispatches them to the manager's
//! listeners. Listeners belong to the manager, not to a connection, so they
//! carry over when the owner reconnects. There is no automatic reconnection:
//! a dropped connection reports `is_connected() == false` until the owner
//! connects again.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chat_core::{EventKind, ServerEvent, Snowflake};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::registry::ListenerRegistry;
use crate::error::ClientResult;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

struct LiveConnection {
    id: u64,
    connected: Arc<AtomicBool>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl LiveConnection {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct Shared {
    current: RwLock<Option<LiveConnection>>,
    registry: Arc<ListenerRegistry>,
}

impl Shared {
    /// The listener registry, while a connection is live
    fn live_registry(&self) -> Option<&ListenerRegistry> {
        self.is_connected().then_some(&*self.registry)
    }

    fn is_connected(&self) -> bool {
        self.current.read().as_ref().is_some_and(LiveConnection::is_connected)
    }
}

/// Opens and closes the session's socket
pub struct SocketManager {
    url: String,
    shared: Arc<Shared>,
    connect_lock: Mutex<()>,
}

impl SocketManager {
    /// `url` is the socket endpoint without the query, e.g. `ws://localhost:5001/socket`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            shared: Arc::new(Shared::default()),
            connect_lock: Mutex::new(()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open a connection for `user_id`
    ///
    /// `register` runs before the first frame is read, so listeners it adds
    /// see the server's initial presence push. Listeners added on a previous
    /// connection are still registered. Returns `Ok(false)` without
    /// doing anything when a connection is already open; concurrent callers
    /// are serialized.
    ///
    /// # Errors
    /// Returns the handshake error if the server cannot be reached
    pub async fn connect<F>(&self, user_id: Snowflake, register: F) -> ClientResult<bool>
    where
        F: FnOnce(&ListenerRegistry),
    {
        let _guard = self.connect_lock.lock().await;

        if self.shared.is_connected() {
            debug!("Socket already connected");
            return Ok(false);
        }

        let url = format!("{}?userId={user_id}", self.url);
        let (stream, _response) = connect_async(url.as_str()).await?;

        register(&*self.shared.registry);

        let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
        let connected = Arc::new(AtomicBool::new(true));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(read_loop(
            id,
            stream,
            Arc::clone(&self.shared.registry),
            Arc::clone(&connected),
            shutdown_rx,
        ));

        *self.shared.current.write() = Some(LiveConnection {
            id,
            connected,
            shutdown: Some(shutdown_tx),
        });

        info!(connection_id = id, user_id = %user_id, "Socket connected");
        Ok(true)
    }

    /// Close the connection; returns whether one was open
    pub fn disconnect(&self) -> bool {
        let Some(mut conn) = self.shared.current.write().take() else {
            return false;
        };

        let was_connected = conn.connected.swap(false, Ordering::SeqCst);
        if let Some(shutdown) = conn.shutdown.take() {
            let _ = shutdown.send(());
        }

        info!(connection_id = conn.id, was_connected, "Socket disconnected");
        was_connected
    }

    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }

    /// Listener-only view of this manager's connection
    pub fn handle(&self) -> SocketHandle {
        SocketHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Drop for SocketManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for SocketManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketManager")
            .field("url", &self.url)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Attach and detach listeners on the live connection
///
/// Every operation is a no-op (returning `false` or `0`) while no
/// connection is open.
#[derive(Clone)]
pub struct SocketHandle {
    shared: Arc<Shared>,
}

impl SocketHandle {
    pub fn on<F>(&self, kind: EventKind, listener: F) -> bool
    where
        F: Fn(&ServerEvent) + Send + Sync + 'static,
    {
        match self.shared.live_registry() {
            Some(registry) => {
                registry.on(kind, listener);
                true
            }
            None => false,
        }
    }

    /// Register `listener` as the only listener for `kind`
    pub fn replace<F>(&self, kind: EventKind, listener: F) -> bool
    where
        F: Fn(&ServerEvent) + Send + Sync + 'static,
    {
        match self.shared.live_registry() {
            Some(registry) => {
                registry.replace(kind, listener);
                true
            }
            None => false,
        }
    }

    pub fn off(&self, kind: EventKind) -> bool {
        self.shared
            .live_registry()
            .is_some_and(|registry| registry.off(kind) > 0)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.shared
            .live_registry()
            .map_or(0, |registry| registry.listener_count(kind))
    }

    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }
}

impl std::fmt::Debug for SocketHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketHandle")
            .field("connected", &self.is_connected())
            .finish()
    }
}

async fn read_loop(
    id: u64,
    stream: WsStream,
    registry: Arc<ListenerRegistry>,
    connected: Arc<AtomicBool>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            // Fires on an explicit disconnect and when the manager is dropped
            _ = &mut shutdown => {
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
                break;
            }
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => match ServerEvent::from_json(&text) {
                    Ok(event) => {
                        let delivered = registry.dispatch(&event);
                        debug!(connection_id = id, event = %event.kind(), delivered, "Socket event");
                    }
                    Err(e) => warn!(connection_id = id, error = %e, "Dropping malformed socket frame"),
                },
                Some(Ok(Message::Close(_))) | None => {
                    debug!(connection_id = id, "Server closed the socket");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(connection_id = id, error = %e, "Socket read failed");
                    break;
                }
            },
        }
    }

    connected.store(false, Ordering::SeqCst);
}
