//! Chat store
//!
//! Owns the contact list, the open conversation, and its messages. Live
//! messages arrive through a single `newMessage` listener attached to the
//! session's socket; the store never opens or closes the connection itself.

use std::sync::Arc;

use chat_core::{EventKind, Message, SendMessageRequest, ServerEvent, Snowflake, User};
use parking_lot::RwLock;
use tracing::{debug, instrument};

use super::guard::{FlagGuard, Pending, PendingGuard};
use crate::error::ClientError;
use crate::http::HttpClient;
use crate::notify::Notifier;
use crate::socket::SocketHandle;

/// Observable chat state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Messages of the selected conversation, ordered by id
    ///
    /// Id order equals arrival order because the server issues Snowflake
    /// ids, which increase with creation time.
    pub messages: Vec<Message>,
    pub users: Vec<User>,
    pub selected_user: Option<User>,
    pub is_users_loading: bool,
    /// Raised while any history request is outstanding
    pub is_messages_loading: bool,
    history_requests: Pending,
}

impl ChatState {
    fn selected_id(&self) -> Option<Snowflake> {
        self.selected_user.as_ref().map(|u| u.id)
    }

    fn contains(&self, id: Snowflake) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    /// Append unless already present; keeps id order
    fn insert(&mut self, message: Message) -> bool {
        if self.contains(message.id) {
            return false;
        }
        let at = self.messages.partition_point(|m| m.id < message.id);
        self.messages.insert(at, message);
        true
    }

    /// Replace the list with the history of the conversation with `user_id`
    ///
    /// Live messages of that conversation already in the list are kept,
    /// de-duplicated by id. Returns `false`, leaving the state untouched, if
    /// another conversation has been selected since the request started.
    fn apply_history(&mut self, user_id: Snowflake, mut history: Vec<Message>) -> bool {
        if self.selected_id().is_some_and(|id| id != user_id) {
            return false;
        }

        let live: Vec<Message> = std::mem::take(&mut self.messages)
            .into_iter()
            .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
            .collect();

        history.sort_by_key(|m| m.id);
        history.dedup_by_key(|m| m.id);
        self.messages = history;
        for message in live {
            self.insert(message);
        }
        true
    }
}

fn history_requests(state: &mut ChatState) -> (&mut Pending, &mut bool) {
    (&mut state.history_requests, &mut state.is_messages_loading)
}

/// Chat store
pub struct ChatStore {
    http: HttpClient,
    socket: SocketHandle,
    state: Arc<RwLock<ChatState>>,
    notifier: Arc<dyn Notifier>,
}

impl ChatStore {
    pub fn new(http: HttpClient, socket: SocketHandle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            http,
            socket,
            state: Arc::new(RwLock::new(ChatState::default())),
            notifier,
        }
    }

    /// Load every user except the current one
    #[instrument(skip(self))]
    pub async fn get_users(&self) -> bool {
        let _loading = FlagGuard::raise(&self.state, |s| &mut s.is_users_loading);

        match self.http.get::<Vec<User>>("/message/user").await {
            Ok(users) => {
                self.state.write().users = users;
                true
            }
            Err(e) => {
                self.notifier.error(&e.user_message());
                false
            }
        }
    }

    /// Load the conversation history with `user_id`
    ///
    /// The history replaces the list. Live messages for the same conversation
    /// that arrived while the request was in flight are kept, de-duplicated by
    /// id. A response for a conversation that is no longer selected is
    /// dropped.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_messages(&self, user_id: Snowflake) -> bool {
        let _loading = PendingGuard::raise(&self.state, history_requests);

        let history = match self
            .http
            .get::<Vec<Message>>(&format!("/message/{user_id}"))
            .await
        {
            Ok(history) => history,
            Err(e) => {
                self.notifier.error(&e.user_message());
                return false;
            }
        };

        let applied = self.state.write().apply_history(user_id, history);
        if !applied {
            debug!("Discarding history for a conversation no longer selected");
        }
        applied
    }

    /// Send to the selected user and append the server's copy
    ///
    /// Nothing is appended before the server confirms.
    #[instrument(skip(self, request))]
    pub async fn send_message(&self, request: SendMessageRequest) -> bool {
        let Some(receiver_id) = self.state.read().selected_id() else {
            self.notifier
                .error(&ClientError::NoConversationSelected.user_message());
            return false;
        };

        match self
            .http
            .post::<_, Message>(&format!("/message/send/{receiver_id}"), &request)
            .await
        {
            Ok(message) => {
                let mut state = self.state.write();
                if state.selected_id() == Some(receiver_id) {
                    state.insert(message);
                }
                true
            }
            Err(e) => {
                self.notifier.error(&e.user_message());
                false
            }
        }
    }

    /// Attach the `newMessage` listener, replacing any previous one
    ///
    /// Does nothing without a selection or without a live socket.
    pub fn subscribe_to_messages(&self) -> bool {
        if self.state.read().selected_user.is_none() {
            return false;
        }

        let state = Arc::clone(&self.state);
        self.socket.replace(EventKind::NewMessage, move |event| {
            let ServerEvent::NewMessage(message) = event else {
                return;
            };
            let mut state = state.write();
            if state.selected_id() == Some(message.sender_id) {
                state.insert(message.clone());
            }
        })
    }

    pub fn unsubscribe_from_messages(&self) -> bool {
        self.socket.off(EventKind::NewMessage)
    }

    /// Switch the open conversation
    ///
    /// Messages of the previous conversation are dropped when the selection
    /// changes. The caller loads the new history with [`Self::get_messages`].
    pub fn set_selected_user(&self, user: Option<User>) {
        self.unsubscribe_from_messages();

        let subscribe = {
            let mut state = self.state.write();
            if state.selected_id() != user.as_ref().map(|u| u.id) {
                state.messages.clear();
            }
            state.selected_user = user;
            state.selected_user.is_some()
        };

        if subscribe {
            self.subscribe_to_messages();
        }
    }

    /// Select `user` and load the history
    pub async fn open_conversation(&self, user: User) -> bool {
        let user_id = user.id;
        self.set_selected_user(Some(user));
        self.get_messages(user_id).await
    }

    /// Drop all conversation state and the message listener
    pub fn reset(&self) {
        self.unsubscribe_from_messages();
        *self.state.write() = ChatState::default();
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.read().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.read().messages.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    pub fn selected_user(&self) -> Option<User> {
        self.state.read().selected_user.clone()
    }

    pub fn message_listener_count(&self) -> usize {
        self.socket.listener_count(EventKind::NewMessage)
    }
}

impl std::fmt::Debug for ChatStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStore")
            .field("socket", &self.socket)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}
