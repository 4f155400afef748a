/*
 * Responsibility
 * - GET /health (疎通用, 認証なし)
 * - backend には問い合わせない: proxy プロセス自体の生存確認のみ
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "identityMode": state.identity.mode()})),
    )
}
