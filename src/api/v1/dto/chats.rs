/*
 * Responsibility
 * - Chats の request/response DTO (camelCase)
 * - validate() は backend 呼び出し前の形式チェックのみ
 * - owner (userId) は body から受け取っても使わない: 解決済み identity で上書きする
 */
use serde::{Deserialize, Serialize};

use crate::services::chat_backend::{
    Chat, ChatId, Message, RenameChat, SetPrompt, WriteMessage, WriteMessageReply,
};
use crate::services::chat_gateway::ChatDraft;

const MAX_TITLE_CHARS: usize = 256;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    // accepted for wire compatibility, never trusted
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
}

impl CreateChatRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_title(&self.title)
    }

    pub fn into_draft(self) -> ChatDraft {
        ChatDraft { title: self.title }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPromptRequest {
    pub chat_id: ChatId,
    pub prompt_id: i64,
}

impl From<SetPromptRequest> for SetPrompt {
    fn from(req: SetPromptRequest) -> Self {
        SetPrompt {
            chat_id: req.chat_id,
            prompt_id: req.prompt_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameChatRequest {
    pub chat_id: ChatId,
    pub new_title: String,
}

impl RenameChatRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_title(&self.new_title)
    }
}

impl From<RenameChatRequest> for RenameChat {
    fn from(req: RenameChatRequest) -> Self {
        RenameChat {
            chat_id: req.chat_id,
            new_title: req.new_title,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteMessageRequest {
    pub chat_id: ChatId,
    pub message: String,
    pub model: String,
}

impl WriteMessageRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.message.trim().is_empty() {
            return Err("message is required");
        }
        if self.model.trim().is_empty() {
            return Err("model is required");
        }
        Ok(())
    }
}

impl From<WriteMessageRequest> for WriteMessage {
    fn from(req: WriteMessageRequest) -> Self {
        WriteMessage {
            chat_id: req.chat_id,
            message: req.message,
            model: req.model,
        }
    }
}

fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title is required");
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err("title must be <= 256 chars");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub id: ChatId,
    pub user_id: String,
    pub title: Option<String>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            user_id: chat.user_id,
            title: chat.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    pub id: ChatId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message_id: i64,
    pub chat_id: ChatId,
    pub author: String,
    pub content: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            message_id: m.message_id,
            chat_id: m.chat_id,
            author: m.author,
            content: m.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WriteMessageResponse {
    pub message: String,
}

impl From<WriteMessageReply> for WriteMessageResponse {
    fn from(reply: WriteMessageReply) -> Self {
        Self {
            message: reply.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_and_keeps_foreign_owner_out_of_draft() {
        let req: CreateChatRequest =
            serde_json::from_str(r#"{"userId":"mallory","title":"plans"}"#).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("mallory"));

        let draft = req.into_draft();
        assert_eq!(draft.title, "plans");
    }

    #[test]
    fn titles_and_messages_are_validated() {
        let blank = CreateChatRequest {
            user_id: None,
            title: "  ".into(),
        };
        assert!(blank.validate().is_err());

        let long = RenameChatRequest {
            chat_id: 1,
            new_title: "x".repeat(MAX_TITLE_CHARS + 1),
        };
        assert!(long.validate().is_err());

        let write = WriteMessageRequest {
            chat_id: 1,
            message: "hi".into(),
            model: "".into(),
        };
        assert_eq!(write.validate(), Err("model is required"));
    }

    #[test]
    fn responses_use_camel_case() {
        let json = serde_json::to_value(ChatResponse::from(Chat {
            id: 3,
            user_id: "u1".into(),
            title: None,
        }))
        .unwrap();
        assert_eq!(json["userId"], "u1");
        assert!(json["title"].is_null());
    }
}
