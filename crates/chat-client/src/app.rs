//! Client wiring

use std::sync::Arc;

use chat_common::ClientConfig;

use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::notify::Notifier;
use crate::stores::{ChatStore, SessionStore};

/// Session and chat stores sharing one cookie jar and one socket
#[derive(Debug)]
pub struct ChatApp {
    session: SessionStore,
    chat: ChatStore,
}

impl ChatApp {
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> ClientResult<Self> {
        let http = HttpClient::from_config(config)?;
        let session = SessionStore::new(http.clone(), config.socket_url(), Arc::clone(&notifier));
        let chat = ChatStore::new(http, session.socket(), notifier);

        Ok(Self { session, chat })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn chat(&self) -> &ChatStore {
        &self.chat
    }

    /// Log out and forget the open conversation
    pub async fn logout(&self) {
        self.chat.reset();
        self.session.logout().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::TracingNotifier;

    #[test]
    fn test_new_from_development_config() {
        let app = ChatApp::new(&ClientConfig::development(), Arc::new(TracingNotifier)).unwrap();
        assert!(!app.session.socket().is_connected());
        assert!(app.chat.selected_user().is_none());
    }

    #[tokio::test]
    async fn test_logout_resets_chat() {
        let config = ClientConfig::new(chat_common::Environment::Development, "http://127.0.0.1:9");
        let app = ChatApp::new(&config, Arc::new(TracingNotifier)).unwrap();

        app.logout().await;
        assert!(app.session().auth_user().is_none());
        assert!(app.chat().users().is_empty());
    }
}
