//! OpenRouter gateway implementation

use super::protocol::{ChatRequest, ChatResponse, ErrorBody};
use async_trait::async_trait;
use reqwest::Client;
use songmaster_application::{CompletionRequest, GatewayError, LlmGateway};
use tracing::debug;

/// Connection settings for OpenRouter
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API root, e.g. `https://openrouter.ai/api/v1`
    pub base_url: String,
    pub api_key: String,
    /// Sent as `HTTP-Referer` for OpenRouter's app attribution
    pub referer: Option<String>,
    /// Sent as `X-Title`
    pub title: Option<String>,
}

impl OpenRouterConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            referer: None,
            title: None,
        }
    }

    pub fn with_attribution(mut self, referer: Option<String>, title: Option<String>) -> Self {
        self.referer = referer;
        self.title = title;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// [`LlmGateway`] backed by OpenRouter
pub struct OpenRouterGateway {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterGateway {
    pub fn new(config: OpenRouterConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Build the error for a non-2xx response.
    ///
    /// Prefers the provider's `error.message`, falling back to the status.
    async fn status_error(response: reqwest::Response) -> GatewayError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .and_then(|detail| detail.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("OpenRouter error: {}", status));
        GatewayError::HttpStatus { status, message }
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            "Sending completion request"
        );

        let mut builder = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&ChatRequest::from(&request));
        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("invalid response body: {}", e)))?;

        let text = body.into_text().ok_or(GatewayError::EmptyResponse)?;
        debug!(model = %request.model, chars = text.len(), "Completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use songmaster_domain::Message;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> OpenRouterGateway {
        OpenRouterGateway::new(
            OpenRouterConfig::new(format!("{}/api/v1/", server.uri()), "test-key").with_attribution(
                Some("https://songmaster.app".to_string()),
                Some("SongMaster".to_string()),
            ),
        )
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            "anthropic/claude-sonnet-4-5",
            vec![Message::system("be a songwriter"), Message::user("rain")],
        )
        .with_max_tokens(4000)
    }

    #[tokio::test]
    async fn test_sends_openai_shaped_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("HTTP-Referer", "https://songmaster.app"))
            .and(header("X-Title", "SongMaster"))
            .and(body_partial_json(json!({
                "model": "anthropic/claude-sonnet-4-5",
                "messages": [
                    {"role": "system", "content": "be a songwriter"},
                    {"role": "user", "content": "rain"}
                ],
                "max_tokens": 4000,
                "response_format": {"type": "json_object"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"name\": \"Rain\"}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = gateway(&server).complete(request()).await.unwrap();
        assert_eq!(text, "{\"name\": \"Rain\"}");
    }

    #[tokio::test]
    async fn test_error_message_from_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(402)
                    .set_body_json(json!({"error": {"message": "Insufficient credits"}})),
            )
            .mount(&server)
            .await;

        let err = gateway(&server).complete(request()).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::HttpStatus {
                status: 402,
                message: "Insufficient credits".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_error_without_body_uses_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = gateway(&server).complete(request()).await.unwrap_err();
        assert_eq!(err.to_string(), "OpenRouter error: 500");
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = gateway(&server).complete(request()).await.unwrap_err();
        assert_eq!(err, GatewayError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_plain_text_request_omits_response_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "hello"}}]
            })))
            .mount(&server)
            .await;

        gateway(&server)
            .complete(request().plain_text())
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert!(body.get("response_format").is_none());
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }
}
