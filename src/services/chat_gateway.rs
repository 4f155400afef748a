//! Ownership-gated dispatch of chat operations to the backend.
//!
//! Every operation on an existing chat goes through [`ChatGateway::assert_owned`] first.
//! A chat that does not exist and a chat owned by someone else are the same outcome
//! ([`Denied`]), so non-owners learn nothing about which ids exist.
//!
//! No error escapes unclassified: list reads collapse backend failures into an empty
//! list, everything else into a [`GatewayError`].
use std::sync::Arc;

use thiserror::Error;

use crate::services::chat_backend::{
    BackendError, Chat, ChatBackend, ChatId, Forward, Message, NewChat, RenameChat, SetPrompt,
    WriteMessage, WriteMessageReply,
};
use crate::services::identity::Caller;

/// The chat is missing or not owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chat not found or not owned by caller")]
pub struct Denied;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GatewayError {
    // forbidden-or-missing, deliberately indistinguishable
    #[error("chat not found")]
    NotFound,
    #[error("chat backend failure")]
    Upstream,
}

impl From<Denied> for GatewayError {
    fn from(_: Denied) -> Self {
        GatewayError::NotFound
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Caller-supplied fields for a new chat. Any owner the caller sends is dropped
/// before it gets here.
#[derive(Debug, Clone)]
pub struct ChatDraft {
    pub title: String,
}

#[derive(Clone)]
pub struct ChatGateway {
    backend: Arc<dyn ChatBackend>,
}

impl std::fmt::Debug for ChatGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatGateway")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl ChatGateway {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Fetches the chat and checks that its owner is exactly the caller's identity.
    ///
    /// Runs on every call; nothing is cached between requests.
    pub async fn assert_owned(&self, caller: &Caller, chat_id: ChatId) -> Result<Chat, Denied> {
        let identity = caller.identity();

        let chat = match self.backend.get_chat(forward(caller), chat_id).await {
            Ok(chat) => chat,
            Err(err) => {
                log_backend_failure("get_chat", chat_id, &err);
                return Err(Denied);
            }
        };

        if chat.user_id != identity.as_str() {
            tracing::warn!(chat_id, user = %identity, "access denied to chat");
            return Err(Denied);
        }

        Ok(chat)
    }

    /// Chats owned by the caller. Backend failures yield an empty list.
    pub async fn list_chats(&self, caller: &Caller) -> Vec<Chat> {
        let identity = caller.identity();
        match self
            .backend
            .list_chats(forward(caller), identity.as_str())
            .await
        {
            Ok(chats) => chats,
            Err(err) => {
                tracing::error!(user = %identity, error = %err, "error fetching chats");
                Vec::new()
            }
        }
    }

    pub async fn get_chat(&self, caller: &Caller, chat_id: ChatId) -> GatewayResult<Chat> {
        Ok(self.assert_owned(caller, chat_id).await?)
    }

    /// Creates a chat owned by the caller's resolved identity.
    pub async fn create_chat(&self, caller: &Caller, draft: ChatDraft) -> GatewayResult<ChatId> {
        let new_chat = NewChat {
            user_id: caller.identity().as_str().to_string(),
            title: draft.title,
        };

        self.backend
            .create_chat(forward(caller), &new_chat)
            .await
            .map_err(|err| {
                tracing::error!(user = %caller.identity(), error = %err, "error creating chat");
                GatewayError::Upstream
            })
    }

    pub async fn set_prompt(&self, caller: &Caller, req: SetPrompt) -> GatewayResult<()> {
        self.assert_owned(caller, req.chat_id).await?;
        self.backend
            .set_prompt(forward(caller), &req)
            .await
            .map_err(|err| upstream("set_prompt", req.chat_id, &err))
    }

    pub async fn rename_chat(&self, caller: &Caller, req: RenameChat) -> GatewayResult<()> {
        self.assert_owned(caller, req.chat_id).await?;
        self.backend
            .rename_chat(forward(caller), &req)
            .await
            .map_err(|err| upstream("rename_chat", req.chat_id, &err))
    }

    pub async fn delete_chat(&self, caller: &Caller, chat_id: ChatId) -> GatewayResult<()> {
        self.assert_owned(caller, chat_id).await?;
        self.backend
            .delete_chat(forward(caller), chat_id)
            .await
            .map_err(|err| upstream("delete_chat", chat_id, &err))
    }

    /// Messages of an owned chat. A failing message fetch yields an empty list;
    /// a failing ownership check does not.
    pub async fn list_messages(
        &self,
        caller: &Caller,
        chat_id: ChatId,
    ) -> GatewayResult<Vec<Message>> {
        self.assert_owned(caller, chat_id).await?;
        match self.backend.list_messages(forward(caller), chat_id).await {
            Ok(messages) => Ok(messages),
            Err(err) => {
                log_backend_failure("list_messages", chat_id, &err);
                Ok(Vec::new())
            }
        }
    }

    pub async fn write_message(
        &self,
        caller: &Caller,
        req: WriteMessage,
    ) -> GatewayResult<WriteMessageReply> {
        self.assert_owned(caller, req.chat_id).await?;
        self.backend
            .write_message(forward(caller), &req)
            .await
            .map_err(|err| upstream("write_message", req.chat_id, &err))
    }
}

fn forward(caller: &Caller) -> Forward<'_> {
    Forward {
        bearer: caller.bearer(),
        request_id: caller.request_id(),
    }
}

fn log_backend_failure(op: &'static str, chat_id: ChatId, err: &BackendError) {
    tracing::error!(op, chat_id, error = %err, "chat backend call failed");
}

fn upstream(op: &'static str, chat_id: ChatId, err: &BackendError) -> GatewayError {
    log_backend_failure(op, chat_id, err);
    GatewayError::Upstream
}
