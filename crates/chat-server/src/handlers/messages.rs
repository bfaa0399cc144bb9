//! Message handlers

use axum::{extract::State, Json};
use chat_core::{Message, SendMessageRequest, User};

use crate::extractors::{AuthUser, JsonBody, UserIdPath};
use crate::response::{ApiResult, Created};
use crate::services::MessageService;
use crate::state::AppState;

/// Users for the sidebar
///
/// GET /message/user
pub async fn list_users(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<User>>> {
    let users = MessageService::new(state.service_context())
        .list_contacts(auth.user_id)
        .await?;
    Ok(Json(users))
}

/// GET /message/:user_id
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    UserIdPath(peer_id): UserIdPath,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = MessageService::new(state.service_context())
        .conversation(auth.user_id, peer_id)
        .await?;
    Ok(Json(messages))
}

/// POST /message/send/:user_id
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    UserIdPath(receiver_id): UserIdPath,
    JsonBody(request): JsonBody<SendMessageRequest>,
) -> ApiResult<Created<Json<Message>>> {
    let message = MessageService::new(state.service_context())
        .send(auth.user_id, receiver_id, request)
        .await?;
    Ok(Created(Json(message)))
}
