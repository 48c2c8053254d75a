use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::constants::CHAT_API_PATH;
use crate::errors::{ChatboxError, ChatboxResult};

/// One best-effort request to the chat backend. `Ok(None)` means the server
/// answered but without a usable reply.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send(&self, message: &str) -> ChatboxResult<Option<String>>;
}

/// `ChatApi` over HTTP: posts `{"message": ...}` and reads the `reply` field
/// out of whatever comes back.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
    path: String,
}

impl HttpChatApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpChatApi::with_path(base_url, CHAT_API_PATH)
    }

    pub fn with_path(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        HttpChatApi {
            client: Client::new(),
            base_url: base_url.into(),
            path: path.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send(&self, message: &str) -> ChatboxResult<Option<String>> {
        let payload = json!({ "message": message });

        let response = self
            .client
            .post(self.url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatboxError::transport_error(format!("Request failed: {}", e)))?;

        // The backend reports its own failures as JSON bodies, so the status
        // line is not consulted; an unreadable body is the only hard failure.
        let body = response
            .text()
            .await
            .map_err(|e| ChatboxError::transport_error(format!("Failed to read response: {}", e)))?;

        let data: Value = serde_json::from_str(&body)
            .map_err(|e| ChatboxError::malformed_reply(e.to_string()))?;

        Ok(data
            .get("reply")
            .and_then(Value::as_str)
            .filter(|reply| !reply.is_empty())
            .map(|reply| reply.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn relays_reply_from_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "message": "hello" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "reply": "hi there" })),
            )
            .mount(&server)
            .await;

        let api = HttpChatApi::new(server.uri());
        let reply = api.send("hello").await.unwrap();
        assert_eq!(reply.as_deref(), Some("hi there"));
    }

    #[tokio::test]
    async fn missing_reply_field_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(server.uri());
        assert_eq!(api.send("hello").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_reply_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "" })))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(server.uri());
        assert_eq!(api.send("hello").await.unwrap(), None);
    }

    #[tokio::test]
    async fn error_status_with_json_body_is_not_a_transport_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "error": "assistant unavailable" })),
            )
            .mount(&server)
            .await;

        let api = HttpChatApi::new(server.uri());
        assert_eq!(api.send("hello").await.unwrap(), None);
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>boom</html>"))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(server.uri());
        let err = api.send("hello").await.unwrap_err();
        assert!(matches!(err, ChatboxError::MalformedReply(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_failure() {
        // Discard port; nothing listens there
        let api = HttpChatApi::new("http://127.0.0.1:9");
        let err = api.send("hello").await.unwrap_err();
        assert!(matches!(err, ChatboxError::Transport(_)));
    }

    #[tokio::test]
    async fn custom_endpoint_path_is_respected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/assistant/ask/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "ok" })))
            .mount(&server)
            .await;

        let api = HttpChatApi::with_path(server.uri(), "/assistant/ask/");
        assert_eq!(api.send("hello").await.unwrap().as_deref(), Some("ok"));
    }
}
