use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use url::Url;
use uuid::Uuid;

use crate::services::chat_backend::client::{BackendError, BackendResult, ChatBackend, Forward};
use crate::services::chat_backend::types::{
    Chat, ChatId, Message, NewChat, RenameChat, SetPrompt, WriteMessage, WriteMessageReply,
};

/// HTTP/JSON chat backend.
///
/// One `reqwest::Client` (connection pool) is shared by every request. No retries:
/// a failed call is reported once and the gateway collapses it.
#[derive(Clone, Debug)]
pub struct HttpChatBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpChatBackend {
    // Create a client from a base URL like `http://localhost:8110/api/chat`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url =
            Url::parse(base_url.trim()).map_err(|e| BackendError::Transport(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Transport(format!(
                "not a base url: {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self { base_url, http })
    }

    /// Appends percent-encoded path segments to the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url, fwd: Forward<'_>) -> reqwest::RequestBuilder {
        // reuse the inbound id; mint one only for calls made outside a request
        let request_id = fwd
            .request_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.http
            .request(method, url)
            .bearer_auth(fwd.bearer)
            .header("x-request-id", request_id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> BackendResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status { status });
        }
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> BackendResult<T> {
        let bytes = self
            .send(request)
            .await?
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(BackendError::EmptyBody);
        }

        serde_json::from_slice::<T>(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        fwd: Forward<'_>,
        body: &B,
    ) -> BackendResult<reqwest::Response> {
        let request = self
            .request(method, self.endpoint(segments), fwd)
            .json(body);
        self.send(request).await
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    async fn list_chats(&self, fwd: Forward<'_>, owner: &str) -> BackendResult<Vec<Chat>> {
        let url = self.endpoint(&["list", owner]);
        self.fetch_json(self.request(Method::GET, url, fwd)).await
    }

    async fn get_chat(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<Chat> {
        let url = self.endpoint(&[&chat_id.to_string()]);
        self.fetch_json(self.request(Method::GET, url, fwd)).await
    }

    async fn create_chat(&self, fwd: Forward<'_>, chat: &NewChat) -> BackendResult<ChatId> {
        let request = self
            .request(Method::POST, self.endpoint(&["create"]), fwd)
            .json(chat);
        self.fetch_json(request).await
    }

    async fn set_prompt(&self, fwd: Forward<'_>, req: &SetPrompt) -> BackendResult<()> {
        self.send_json(Method::POST, &["setPrompt"], fwd, req)
            .await
            .map(|_| ())
    }

    async fn rename_chat(&self, fwd: Forward<'_>, req: &RenameChat) -> BackendResult<()> {
        self.send_json(Method::PUT, &["rename"], fwd, req)
            .await
            .map(|_| ())
    }

    async fn delete_chat(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<()> {
        let url = self.endpoint(&["delete", &chat_id.to_string()]);
        self.send(self.request(Method::DELETE, url, fwd))
            .await
            .map(|_| ())
    }

    async fn list_messages(&self, fwd: Forward<'_>, chat_id: ChatId) -> BackendResult<Vec<Message>> {
        let url = self.endpoint(&["messages", &chat_id.to_string()]);
        self.fetch_json(self.request(Method::GET, url, fwd)).await
    }

    async fn write_message(
        &self,
        fwd: Forward<'_>,
        req: &WriteMessage,
    ) -> BackendResult<WriteMessageReply> {
        let request = self
            .request(Method::POST, self.endpoint(&["write"]), fwd)
            .json(req);
        self.fetch_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{delete, get, post, put},
    };
    use serde_json::json;

    use super::*;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api/chat")
    }

    const FWD: Forward<'static> = Forward {
        bearer: "tok",
        request_id: None,
    };

    fn client(base_url: &str) -> HttpChatBackend {
        HttpChatBackend::new(base_url, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn endpoint_appends_and_encodes_segments() {
        let backend = client("http://chat.internal:8110/api/chat/");

        assert_eq!(
            backend.endpoint(&["list", "a b/c@x"]).as_str(),
            "http://chat.internal:8110/api/chat/list/a%20b%2Fc@x"
        );
        assert_eq!(
            backend.endpoint(&["42"]).as_str(),
            "http://chat.internal:8110/api/chat/42"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(HttpChatBackend::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
        assert!(HttpChatBackend::new("   ", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn forwards_bearer_and_decodes_chat() {
        let router = Router::new().route(
            "/api/chat/{id}",
            get(|Path(id): Path<i64>, headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                assert!(headers.contains_key("x-request-id"));
                Json(json!({"id": id, "userId": auth, "title": "t"}))
            }),
        );
        let backend = client(&spawn_backend(router).await);

        let chat = backend.get_chat(FWD, 42).await.unwrap();
        assert_eq!(chat.id, 42);
        assert_eq!(chat.user_id, "Bearer tok");
        assert_eq!(chat.title.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn maps_statuses_and_bodies_to_errors() {
        let router = Router::new()
            .route("/api/chat/{id}", get(|| async { StatusCode::NOT_FOUND }))
            .route("/api/chat/create", post(|| async { "" }))
            .route("/api/chat/messages/{id}", get(|| async { "not json" }));
        let backend = client(&spawn_backend(router).await);

        assert!(matches!(
            backend.get_chat(FWD, 1).await,
            Err(BackendError::Status { status }) if status == StatusCode::NOT_FOUND
        ));
        let new_chat = NewChat {
            user_id: "u1".into(),
            title: "t".into(),
        };
        assert!(matches!(
            backend.create_chat(FWD, &new_chat).await,
            Err(BackendError::EmptyBody)
        ));
        assert!(matches!(
            backend.list_messages(FWD, 1).await,
            Err(BackendError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn mutations_hit_the_expected_routes() {
        let router = Router::new()
            .route(
                "/api/chat/create",
                post(|Json(body): Json<NewChat>| async move {
                    assert_eq!(body.user_id, "u1");
                    Json(7_i64)
                }),
            )
            .route(
                "/api/chat/setPrompt",
                post(|Json(body): Json<SetPrompt>| async move {
                    assert_eq!(body.prompt_id, 3);
                    StatusCode::OK
                }),
            )
            .route(
                "/api/chat/rename",
                put(|Json(body): Json<RenameChat>| async move {
                    assert_eq!(body.new_title, "new");
                    StatusCode::OK
                }),
            )
            .route(
                "/api/chat/delete/{id}",
                delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route(
                "/api/chat/write",
                post(|Json(body): Json<WriteMessage>| async move {
                    Json(json!({"message": format!("echo: {}", body.message)}))
                }),
            )
            .route(
                "/api/chat/list/{owner}",
                get(|Path(owner): Path<String>| async move {
                    Json(json!([{"id": 1, "userId": owner, "title": null}]))
                }),
            );
        let backend = client(&spawn_backend(router).await);

        let new_chat = NewChat {
            user_id: "u1".into(),
            title: "t".into(),
        };
        assert_eq!(backend.create_chat(FWD, &new_chat).await.unwrap(), 7);
        backend
            .set_prompt(
                FWD,
                &SetPrompt {
                    chat_id: 1,
                    prompt_id: 3,
                },
            )
            .await
            .unwrap();
        backend
            .rename_chat(
                FWD,
                &RenameChat {
                    chat_id: 1,
                    new_title: "new".into(),
                },
            )
            .await
            .unwrap();
        assert!(backend.delete_chat(FWD, 1).await.is_err());

        let reply = backend
            .write_message(
                FWD,
                &WriteMessage {
                    chat_id: 1,
                    message: "hi".into(),
                    model: "m".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(reply.message, "echo: hi");

        let chats = backend.list_chats(FWD, "a@b.c").await.unwrap();
        assert_eq!(chats[0].user_id, "a@b.c");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = client(&format!("http://{addr}/api/chat"));
        assert!(matches!(
            backend.list_chats(FWD, "u1").await,
            Err(BackendError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn reuses_the_inbound_request_id() {
        let router = Router::new().route(
            "/api/chat/messages/{id}",
            get(|headers: HeaderMap| async move {
                assert_eq!(
                    headers.get("x-request-id").and_then(|v| v.to_str().ok()),
                    Some("req-123")
                );
                Json(json!([]))
            }),
        );
        let backend = client(&spawn_backend(router).await);

        let fwd = Forward {
            bearer: "tok",
            request_id: Some("req-123"),
        };
        assert!(backend.list_messages(fwd, 1).await.unwrap().is_empty());
    }
}
