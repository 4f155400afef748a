/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - identity: 起動時に選んだ IdentityResolver
 *   - chats: ChatBackend を包んだ ownership-gated な ChatGateway
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{chat_gateway::ChatGateway, identity::IdentityResolver};

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityResolver>,
    pub chats: ChatGateway,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityResolver>, chats: ChatGateway) -> Self {
        Self { identity, chats }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("identity", &self.identity.mode())
            .field("chats", &self.chats)
            .finish()
    }
}
