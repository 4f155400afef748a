use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::extract::rejection::JsonRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::services::chat_backend::ChatId;

/// `Json<T>` と同じだが、失敗時は `AppError::BadRequest` を返す
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// `/{chat_id}` の path parameter。数値でなければ 400
pub struct ChatIdPath(pub ChatId);

impl<S> FromRequestParts<S> for ChatIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(chat_id) = Path::<ChatId>::from_request_parts(parts, state).await?;
        Ok(ChatIdPath(chat_id))
    }
}
