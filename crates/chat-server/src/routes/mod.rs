//! Route definitions
//!
//! REST endpoints live under `/api`; the socket and health probe at the root.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{auth, health, messages};
use crate::socket::socket_handler;
use crate::state::AppState;

/// Create the main router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .route("/socket", get(socket_handler))
        .route("/health", get(health::health_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(message_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/check", get(auth::check))
        .route("/auth/update-profile", put(auth::update_profile))
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/message/user", get(messages::list_users))
        .route("/message/:user_id", get(messages::get_messages))
        .route("/message/send/:user_id", post(messages::send_message))
}
