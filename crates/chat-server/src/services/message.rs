//! Message service
//!
//! Contacts, conversation history, and sending with live delivery.

use chat_common::{AppError, AppResult};
use chat_core::{DomainError, Message, SendMessageRequest, ServerEvent, Snowflake, User};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Everyone the caller can talk to
    #[instrument(skip(self))]
    pub async fn list_contacts(&self, user_id: Snowflake) -> AppResult<Vec<User>> {
        Ok(self.ctx.user_repo().list_except(user_id).await?)
    }

    /// Full history between the caller and a peer
    #[instrument(skip(self))]
    pub async fn conversation(&self, user_id: Snowflake, peer_id: Snowflake) -> AppResult<Vec<Message>> {
        Ok(self
            .ctx
            .message_repo()
            .find_conversation(user_id, peer_id)
            .await?)
    }

    /// Store a message and push it to the receiver's open sockets
    #[instrument(skip(self, request))]
    pub async fn send(
        &self,
        sender_id: Snowflake,
        receiver_id: Snowflake,
        request: SendMessageRequest,
    ) -> AppResult<Message> {
        let request = request.normalized();
        if !request.has_content() {
            return Err(DomainError::EmptyMessage.into());
        }
        if sender_id == receiver_id {
            return Err(DomainError::SelfMessage.into());
        }

        if self.ctx.user_repo().find_by_id(receiver_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let message = Message::new(
            self.ctx.generate_id(),
            sender_id,
            receiver_id,
            request.text,
            request.image,
        );
        self.ctx.message_repo().create(&message).await?;

        info!(message_id = %message.id, "Message sent");

        let delivered = self
            .ctx
            .connections()
            .send_to_user(receiver_id, ServerEvent::NewMessage(message.clone()))
            .await;
        debug!(message_id = %message.id, delivered, "Live delivery");

        Ok(message)
    }
}
