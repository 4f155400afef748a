/*
 * Responsibility
 * - chat 系 handler: DTO validation → ChatGateway 呼び出し → response
 * - 認証済み Caller は middleware が解決済み (AuthCaller extractor)
 * - ownership の判定は gateway 側に集約 (handler では行わない)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::chats::{
            ChatResponse, CreateChatRequest, CreateChatResponse, MessageResponse,
            RenameChatRequest, SetPromptRequest, WriteMessageRequest, WriteMessageResponse,
        },
        extractors::{AuthCaller, ChatIdPath, JsonBody},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_chats(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
) -> Json<Vec<ChatResponse>> {
    let chats = state.chats.list_chats(&caller).await;
    Json(chats.into_iter().map(ChatResponse::from).collect())
}

pub async fn get_chat(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    ChatIdPath(chat_id): ChatIdPath,
) -> Result<Json<ChatResponse>, AppError> {
    let chat = state.chats.get_chat(&caller, chat_id).await?;
    Ok(Json(chat.into()))
}

pub async fn create_chat(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    JsonBody(req): JsonBody<CreateChatRequest>,
) -> Result<(StatusCode, Json<CreateChatResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_CHAT", msg))?;

    if let Some(claimed) = req.user_id.as_deref()
        && claimed != caller.identity().as_str()
    {
        tracing::warn!(
            user = %caller.identity(),
            claimed,
            "ignoring caller-supplied chat owner"
        );
    }

    let id = state.chats.create_chat(&caller, req.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(CreateChatResponse { id })))
}

pub async fn set_prompt(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    JsonBody(req): JsonBody<SetPromptRequest>,
) -> Result<StatusCode, AppError> {
    state.chats.set_prompt(&caller, req.into()).await?;
    Ok(StatusCode::OK)
}

pub async fn rename_chat(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    JsonBody(req): JsonBody<RenameChatRequest>,
) -> Result<StatusCode, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_TITLE", msg))?;

    state.chats.rename_chat(&caller, req.into()).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_chat(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    ChatIdPath(chat_id): ChatIdPath,
) -> Result<StatusCode, AppError> {
    state.chats.delete_chat(&caller, chat_id).await?;
    Ok(StatusCode::OK)
}

pub async fn list_messages(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    ChatIdPath(chat_id): ChatIdPath,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let messages = state.chats.list_messages(&caller, chat_id).await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

pub async fn write_message(
    State(state): State<AppState>,
    AuthCaller(caller): AuthCaller,
    JsonBody(req): JsonBody<WriteMessageRequest>,
) -> Result<Json<WriteMessageResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_MESSAGE", msg))?;

    let reply = state.chats.write_message(&caller, req.into()).await?;
    Ok(Json(reply.into()))
}
