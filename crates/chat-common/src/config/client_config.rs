//! Client connection settings

use std::env;

use super::app_config::{ConfigError, Environment};

const DEV_SERVER_ORIGIN: &str = "http://localhost:5001";

/// Where the client reaches the chat server
///
/// REST calls go to `<origin>/api`, the socket to `<origin>/socket` with the
/// scheme switched to `ws`/`wss`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub env: Environment,
    pub server_origin: String,
}

impl ClientConfig {
    #[must_use]
    pub fn new(env: Environment, server_origin: impl Into<String>) -> Self {
        let origin: String = server_origin.into();
        Self {
            env,
            server_origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// Development defaults: server on `localhost:5001`
    #[must_use]
    pub fn development() -> Self {
        Self::new(Environment::Development, DEV_SERVER_ORIGIN)
    }

    /// Load from `CHAT_ENV` and `CHAT_SERVER_ORIGIN`
    ///
    /// # Errors
    /// Returns an error in production mode when no origin is configured
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error in production mode when no origin is configured
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = match var("CHAT_ENV") {
            Some(value) => {
                Environment::parse(&value).ok_or(ConfigError::InvalidValue("CHAT_ENV", value))?
            }
            None => Environment::default(),
        };

        let origin = match var("CHAT_SERVER_ORIGIN").filter(|o| !o.is_empty()) {
            Some(origin) => origin,
            None if env.is_production() => {
                return Err(ConfigError::MissingVar("CHAT_SERVER_ORIGIN"))
            }
            None => DEV_SERVER_ORIGIN.to_string(),
        };

        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::InvalidValue("CHAT_SERVER_ORIGIN", origin));
        }

        Ok(Self::new(env, origin))
    }

    /// Base URL for REST calls
    #[must_use]
    pub fn api_base_url(&self) -> String {
        format!("{}/api", self.server_origin)
    }

    /// WebSocket endpoint URL (without the user query)
    #[must_use]
    pub fn socket_url(&self) -> String {
        let origin = if let Some(rest) = self.server_origin.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.server_origin.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.server_origin.clone()
        };
        format!("{origin}/socket")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}
