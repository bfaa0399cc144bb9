//! # chat-server
//!
//! REST API and WebSocket presence server for one-to-one chat, built with Axum.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;
pub mod socket;
pub mod state;
pub mod storage;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
