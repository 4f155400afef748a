//! In-memory `ChatBackend` that records every call (tests only).
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::services::chat_backend::client::{BackendError, BackendResult, ChatBackend, Forward};
use crate::services::chat_backend::types::{
    Chat, ChatId, Message, NewChat, RenameChat, SetPrompt, WriteMessage, WriteMessageReply,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListChats(String),
    GetChat(ChatId),
    CreateChat(String),
    SetPrompt(ChatId),
    RenameChat(ChatId),
    DeleteChat(ChatId),
    ListMessages(ChatId),
    WriteMessage(ChatId),
}

#[derive(Default)]
pub struct MemoryBackend {
    chats: Mutex<BTreeMap<ChatId, Chat>>,
    messages: Mutex<Vec<Message>>,
    calls: Mutex<Vec<Call>>,
    request_ids: Mutex<Vec<Option<String>>>,
    fail_all: AtomicBool,
    fail_after_gate: AtomicBool,
}

impl MemoryBackend {
    pub fn insert_chat(&self, id: ChatId, owner: &str, title: &str) {
        self.chats.lock().unwrap().insert(
            id,
            Chat {
                id,
                user_id: owner.to_string(),
                title: Some(title.to_string()),
            },
        );
    }

    pub fn chat(&self, id: ChatId) -> Option<Chat> {
        self.chats.lock().unwrap().get(&id).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `x-request-id` forwarded with each call, in call order.
    pub fn request_ids(&self) -> Vec<Option<String>> {
        self.request_ids.lock().unwrap().clone()
    }

    /// Every call fails with a transport error.
    pub fn fail_all(&self, on: bool) {
        self.fail_all.store(on, Ordering::SeqCst);
    }

    /// `get_chat` keeps working, every other call fails.
    pub fn fail_after_gate(&self, on: bool) {
        self.fail_after_gate.store(on, Ordering::SeqCst);
    }

    fn record(&self, fwd: Forward<'_>, call: Call) -> BackendResult<()> {
        let gated = !matches!(call, Call::GetChat(_));
        self.calls.lock().unwrap().push(call);
        self.request_ids
            .lock()
            .unwrap()
            .push(fwd.request_id.map(str::to_string));

        if self.fail_all.load(Ordering::SeqCst)
            || (gated && self.fail_after_gate.load(Ordering::SeqCst))
        {
            return Err(BackendError::Transport("connection refused".into()));
        }
        Ok(())
    }

    fn not_found() -> BackendError {
        BackendError::Status {
            status: StatusCode::NOT_FOUND,
        }
    }
}

#[async_trait]
impl ChatBackend for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_chats(&self, fwd: Forward<'_>, owner: &str) -> BackendResult<Vec<Chat>> {
        self.record(fwd, Call::ListChats(owner.to_string()))?;
        Ok(self
            .chats
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect())
    }

    async fn get_chat(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<Chat> {
        self.record(fwd, Call::GetChat(chat_id))?;
        self.chat(chat_id).ok_or_else(Self::not_found)
    }

    async fn create_chat(&self, fwd: Forward<'_>, chat: &NewChat) -> BackendResult<ChatId> {
        self.record(fwd, Call::CreateChat(chat.user_id.clone()))?;
        let mut chats = self.chats.lock().unwrap();
        let id = chats.keys().next_back().copied().unwrap_or(0) + 1;
        chats.insert(
            id,
            Chat {
                id,
                user_id: chat.user_id.clone(),
                title: Some(chat.title.clone()),
            },
        );
        Ok(id)
    }

    async fn set_prompt(&self, fwd: Forward<'_>, req: &SetPrompt) -> BackendResult<()> {
        self.record(fwd, Call::SetPrompt(req.chat_id))
    }

    async fn rename_chat(&self, fwd: Forward<'_>, req: &RenameChat) -> BackendResult<()> {
        self.record(fwd, Call::RenameChat(req.chat_id))?;
        let mut chats = self.chats.lock().unwrap();
        let chat = chats.get_mut(&req.chat_id).ok_or_else(Self::not_found)?;
        chat.title = Some(req.new_title.clone());
        Ok(())
    }

    async fn delete_chat(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<()> {
        self.record(fwd, Call::DeleteChat(chat_id))?;
        self.chats
            .lock()
            .unwrap()
            .remove(&chat_id)
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }

    async fn list_messages(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<Vec<Message>> {
        self.record(fwd, Call::ListMessages(chat_id))?;
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn write_message(
        &self,
        fwd: Forward<'_>,
        req: &WriteMessage,
    ) -> BackendResult<WriteMessageReply> {
        self.record(fwd, Call::WriteMessage(req.chat_id))?;
        let mut messages = self.messages.lock().unwrap();
        let message_id = messages.len() as i64 + 1;
        messages.push(Message {
            message_id,
            chat_id: req.chat_id,
            author: "USER".into(),
            content: req.message.clone(),
        });
        Ok(WriteMessageReply {
            message: req.message.clone(),
        })
    }
}
