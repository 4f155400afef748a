/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし, /chats と /chat/{...} は access middleware (Bearer → Caller) の内側
 */
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    chats::{
        create_chat, delete_chat, get_chat, list_chats, list_messages, rename_chat, set_prompt,
        write_message,
    },
    health::health,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let chats = Router::new()
        .route("/chats", get(list_chats))
        .route("/chat/create", post(create_chat))
        .route("/chat/setPrompt", post(set_prompt))
        .route("/chat/rename", put(rename_chat))
        .route("/chat/write", post(write_message))
        .route("/chat/delete/{chat_id}", delete(delete_chat))
        .route("/chat/{chat_id}", get(get_chat))
        .route("/chat/{chat_id}/messages", get(list_messages));

    Router::new()
        .route("/health", get(health))
        .merge(access::apply(chats, state))
}
