pub mod client;
pub mod http;
pub mod types;

pub use client::{BackendError, ChatBackend, Forward};
pub use http::HttpChatBackend;
pub use types::{
    Chat, ChatId, Message, NewChat, RenameChat, SetPrompt, WriteMessage, WriteMessageReply,
};

#[cfg(test)]
pub mod memory;
