//! Server configuration
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;

/// Main server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub jwt: JwtConfig,
    pub static_files: StaticConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Development vs production mode
///
/// Production switches on static asset serving, secure cookies, JSON logs,
/// and origin-relative API URLs on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse a mode name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Listening address
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database connection string
///
/// Carried for a persistent storage backend; the bundled server keeps its
/// data in memory and only reports whether a URL was supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Cross-origin settings for the browser frontend
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_frontend_origin")]
    pub frontend_origin: String,
}

/// Session token settings
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_session_expiry")]
    pub expiry_secs: i64,
}

/// Built frontend served in production
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_static_dir")]
    pub dir: String,
}

// Default value functions
fn default_app_name() -> String {
    "chat-server".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_frontend_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_session_expiry() -> i64 {
    7 * 24 * 60 * 60 // 7 days
}

fn default_static_dir() -> String {
    "../frontend/dist".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `JWT_SECRET` is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if `JWT_SECRET` is missing or a value cannot be parsed
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = match var("APP_ENV").or_else(|| var("NODE_ENV")) {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => Environment::default(),
        };

        let port = match var("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT", value))?,
            None => default_port(),
        };

        let expiry_secs = match var("JWT_EXPIRY_SECS") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_EXPIRY_SECS", value))?,
            None => default_session_expiry(),
        };

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            server: ServerConfig {
                host: var("HOST").unwrap_or_else(default_host),
                port,
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL").filter(|url| !url.is_empty()),
            },
            cors: CorsConfig {
                frontend_origin: var("FRONTEND_ORIGIN").unwrap_or_else(default_frontend_origin),
            },
            jwt: JwtConfig {
                secret: var("JWT_SECRET")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                expiry_secs,
            },
            static_files: StaticConfig {
                dir: var("STATIC_DIR").unwrap_or_else(default_static_dir),
            },
        })
    }

    /// Configuration for tests and local tooling: loopback, ephemeral port
    #[must_use]
    pub fn for_testing(secret: &str) -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig::default(),
            cors: CorsConfig {
                frontend_origin: default_frontend_origin(),
            },
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiry_secs: default_session_expiry(),
            },
            static_files: StaticConfig {
                dir: default_static_dir(),
            },
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
