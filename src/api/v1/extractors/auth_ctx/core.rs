use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::identity::Caller;
use crate::state::AppState;

/// Handler で、解決済みの `Caller` を受け取るための extractor
/// middleware が `Caller` を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（middleware 未適用の route でも fail-closed）
pub struct AuthCaller(pub Caller);

impl FromRequestParts<AppState> for AuthCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .map(AuthCaller)
            .ok_or(AppError::Unauthorized)
    }
}
