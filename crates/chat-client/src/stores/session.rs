//! Session store
//!
//! Holds the authenticated user and the presence set, and owns the socket
//! connection: it is opened whenever a session is established and closed on
//! logout.

use std::sync::Arc;

use chat_core::{
    EventKind, LoginRequest, ServerEvent, SignupRequest, Snowflake, UpdateProfileRequest, User,
};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::guard::FlagGuard;
use crate::http::HttpClient;
use crate::notify::Notifier;
use crate::profile::image_data_url;
use crate::socket::{SocketHandle, SocketManager};

/// Observable session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub auth_user: Option<User>,
    pub is_checking_auth: bool,
    pub is_signing_up: bool,
    pub is_logging_in: bool,
    pub is_updating_profile: bool,
    /// Replaced wholesale on every presence push
    pub online_users: Vec<Snowflake>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            auth_user: None,
            is_checking_auth: true,
            is_signing_up: false,
            is_logging_in: false,
            is_updating_profile: false,
            online_users: Vec::new(),
        }
    }
}

/// Session store
pub struct SessionStore {
    http: HttpClient,
    socket: SocketManager,
    state: Arc<RwLock<SessionState>>,
    notifier: Arc<dyn Notifier>,
}

impl SessionStore {
    pub fn new(http: HttpClient, socket_url: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            http,
            socket: SocketManager::new(socket_url),
            state: Arc::new(RwLock::new(SessionState::default())),
            notifier,
        }
    }

    /// Restore a session from the cookie, if the server still accepts it
    ///
    /// Failures are silent: an unauthenticated visitor is not an error.
    #[instrument(skip(self))]
    pub async fn check_auth(&self) -> bool {
        let _checking = FlagGuard::raise(&self.state, |s| &mut s.is_checking_auth);

        match self.http.get::<User>("/auth/check").await {
            Ok(user) => {
                self.state.write().auth_user = Some(user);
                self.connect_socket().await;
                true
            }
            Err(e) => {
                debug!(error = %e, "No active session");
                self.state.write().auth_user = None;
                false
            }
        }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> bool {
        let _signing_up = FlagGuard::raise(&self.state, |s| &mut s.is_signing_up);

        match self.http.post::<_, User>("/auth/signup", &request).await {
            Ok(user) => {
                self.establish(user, "Account created successfully").await;
                true
            }
            Err(e) => {
                self.notifier.error(&e.user_message());
                false
            }
        }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> bool {
        let _logging_in = FlagGuard::raise(&self.state, |s| &mut s.is_logging_in);

        match self.http.post::<_, User>("/auth/login", &request).await {
            Ok(user) => {
                self.establish(user, "Logged in successfully").await;
                true
            }
            Err(e) => {
                self.notifier.error(&e.user_message());
                false
            }
        }
    }

    /// End the session
    ///
    /// Local state is cleared and the socket closed whatever the server
    /// answers; only the notification reflects the outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        match self.http.post_empty::<Value>("/auth/logout").await {
            Ok(_) => self.notifier.success("Logged out successfully"),
            Err(e) => self.notifier.error(&e.user_message()),
        }

        self.disconnect_socket();

        let mut state = self.state.write();
        state.auth_user = None;
        state.online_users.clear();
    }

    /// Replace the profile image; the socket is left alone
    #[instrument(skip(self, request))]
    pub async fn update_profile(&self, request: UpdateProfileRequest) -> bool {
        let _updating = FlagGuard::raise(&self.state, |s| &mut s.is_updating_profile);

        match self.http.put::<_, User>("/auth/update-profile", &request).await {
            Ok(user) => {
                self.state.write().auth_user = Some(user);
                self.notifier.success("Profile updated successfully");
                true
            }
            Err(e) => {
                self.notifier.error(&e.user_message());
                false
            }
        }
    }

    /// Upload raw image bytes as the profile picture
    pub async fn upload_profile_image(&self, mime: &str, bytes: &[u8]) -> bool {
        let data_url = image_data_url(mime, bytes);
        self.update_profile(UpdateProfileRequest::new(data_url)).await
    }

    /// Open the socket for the current user
    ///
    /// No-op without a user or when a connection is already open. The
    /// presence listener is (re)registered before any frame is read; other
    /// listeners from an earlier connection stay in place.
    pub async fn connect_socket(&self) -> bool {
        let Some(user_id) = self.state.read().auth_user.as_ref().map(|u| u.id) else {
            return false;
        };
        if self.socket.is_connected() {
            return false;
        }

        let state = Arc::clone(&self.state);
        let register = move |registry: &crate::socket::ListenerRegistry| {
            registry.replace(EventKind::GetOnlineUsers, move |event| {
                if let ServerEvent::GetOnlineUsers(users) = event {
                    let mut state = state.write();
                    // Late frames after logout must not resurrect presence
                    if state.auth_user.is_some() {
                        state.online_users.clone_from(users);
                    }
                }
            });
        };

        match self.socket.connect(user_id, register).await {
            Ok(opened) => opened,
            Err(e) => {
                warn!(error = %e, "Socket connection failed");
                false
            }
        }
    }

    /// Close the socket if it is open
    pub fn disconnect_socket(&self) -> bool {
        if self.socket.is_connected() {
            self.socket.disconnect()
        } else {
            false
        }
    }

    async fn establish(&self, user: User, message: &str) {
        self.state.write().auth_user = Some(user);
        self.notifier.success(message);
        self.connect_socket().await;
    }

    /// Listener-only access to the session's socket
    pub fn socket(&self) -> SocketHandle {
        self.socket.handle()
    }

    pub fn is_socket_connected(&self) -> bool {
        self.socket.is_connected()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn auth_user(&self) -> Option<User> {
        self.state.read().auth_user.clone()
    }

    pub fn is_checking_auth(&self) -> bool {
        self.state.read().is_checking_auth
    }

    pub fn online_users(&self) -> Vec<Snowflake> {
        self.state.read().online_users.clone()
    }

    pub fn is_online(&self, user_id: Snowflake) -> bool {
        self.state.read().online_users.contains(&user_id)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("http", &self.http)
            .field("socket", &self.socket)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}
