//! Bearer credential → `Caller` を extensions に入れる
//!
//! - `Authorization` ヘッダを起動時に選んだ `IdentityResolver` に渡す
//! - 解決できなければ handler / backend に到達する前に 401
//! - 解決した identity はこのリクエストの間ずっと不変 (body から再導出しない)
//! - `x-request-id` (SetRequestIdLayer が付与) も Caller に載せて backend へ引き継ぐ

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::http::REQUEST_ID_HEADER;
use crate::state::AppState;

/// 認証が必要な routes に middleware を適用する。
///
/// 例：
/// ```ignore
/// let chats = middleware::auth::access::apply(chat_routes, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    // route_layer: マッチした route にだけ掛ける (未定義パスは 401 ではなく 404 のまま)
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let caller = match state.identity.resolve(authorization) {
        Ok(caller) => caller.with_request_id(request_id),
        Err(err) => {
            tracing::warn!(
                error = %err,
                mode = state.identity.mode(),
                "identity resolution failed"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(user = %caller.identity(), "caller resolved");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
