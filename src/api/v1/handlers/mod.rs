pub mod chats;
pub mod health;
