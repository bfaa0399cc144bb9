//! Configuration structs

mod app_config;
mod client_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    ServerConfig, StaticConfig,
};
pub use client_config::ClientConfig;
