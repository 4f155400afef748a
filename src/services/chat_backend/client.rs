//! Chat backend interface used by the gateway.
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::services::chat_backend::types::{
    Chat, ChatId, Message, NewChat, RenameChat, SetPrompt, WriteMessage, WriteMessageReply,
};

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend-layer errors (transport/status/decoding).
///
/// Note:
/// - Kept independent from `AppError`; the gateway decides how each failure collapses.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(String),
    #[error("backend returned {status}")]
    Status { status: StatusCode },
    #[error("backend response could not be decoded: {0}")]
    Decode(String),
    #[error("backend returned an empty body")]
    EmptyBody,
}

/// What every backend call carries along from the inbound request.
#[derive(Clone, Copy)]
pub struct Forward<'a> {
    /// The caller's credential, forwarded as-is.
    pub bearer: &'a str,
    /// Inbound `x-request-id`, so proxy and backend logs line up.
    pub request_id: Option<&'a str>,
}

/// Remote chat/message store.
///
/// Every call gets a [`Forward`] for the request it serves. Implementations must be
/// cheap to share (`Arc<dyn ChatBackend>`) and safe for concurrent calls.
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn list_chats(&self, fwd: Forward<'_>, owner: &str) -> BackendResult<Vec<Chat>>;

    async fn get_chat(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<Chat>;

    // Returns the id assigned to the new chat.
    async fn create_chat(&self, fwd: Forward<'_>, chat: &NewChat) -> BackendResult<ChatId>;

    async fn set_prompt(&self, fwd: Forward<'_>, req: &SetPrompt) -> BackendResult<()>;

    async fn rename_chat(&self, fwd: Forward<'_>, req: &RenameChat) -> BackendResult<()>;

    async fn delete_chat(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<()>;

    async fn list_messages(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<Vec<Message>>;

    async fn write_message(
        &self,
        fwd: Forward<'_>,
        req: &WriteMessage,
    ) -> BackendResult<WriteMessageReply>;
}
