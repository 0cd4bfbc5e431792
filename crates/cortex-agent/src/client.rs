//! HTTP transport to the agent endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cortex_auth::CredentialProvider;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, error, instrument};

use crate::errors::{AgentError, ApiErrorInfo, parse_api_error};
use crate::request::AgentRequest;

/// Header naming the bearer token's type.
pub const TOKEN_TYPE_HEADER: &str = "x-snowflake-authorization-token-type";

/// One round trip to the agent.
///
/// Returns the raw event-stream body; parsing belongs to the caller.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Send one request and return the response body.
    async fn send(&self, request: &AgentRequest) -> Result<String, AgentError>;
}

/// reqwest client for the agent run endpoint.
pub struct CortexAgentClient {
    client: reqwest::Client,
    endpoint: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for CortexAgentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CortexAgentClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl CortexAgentClient {
    /// Client for `endpoint` (the full run URL).
    pub fn new(
        endpoint: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, endpoint, credentials))
    }

    /// Client reusing an existing reqwest client.
    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            credentials,
        }
    }

    fn build_headers(&self) -> Result<HeaderMap, AgentError> {
        let token = self.credentials.bearer_token()?;
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| AgentError::Api {
                status: 0,
                message: format!("invalid authorization header: {e}"),
                code: None,
            })?,
        );
        let _ = headers.insert(
            TOKEN_TYPE_HEADER,
            HeaderValue::from_static(self.credentials.token_type()),
        );
        Ok(headers)
    }
}

#[async_trait]
impl AgentTransport for CortexAgentClient {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, messages = request.messages.len()))]
    async fn send(&self, request: &AgentRequest) -> Result<String, AgentError> {
        let headers = self.build_headers()?;
        debug!(
            model = %request.model,
            tools = request.tools.len(),
            "sending agent request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let ApiErrorInfo { message, code } = parse_api_error(&body, status.as_u16());
            error!(
                status = status.as_u16(),
                code = code.as_deref().unwrap_or("unknown"),
                "agent API error"
            );
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
                code,
            });
        }

        debug!(bytes = body.len(), "agent response received");
        Ok(body)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::AgentRequestTemplate;
    use assert_matches::assert_matches;
    use cortex_auth::StaticCredentialProvider;
    use cortex_core::Message;
    use cortex_settings::AgentSettings;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> AgentRequest {
        AgentRequestTemplate::from_settings(&AgentSettings::default())
            .build(vec![Message::user_text("hi")])
    }

    fn client(server: &MockServer, token: &str) -> CortexAgentClient {
        CortexAgentClient::new(
            format!("{}/api/v2/cortex/agent:run", server.uri()),
            Arc::new(StaticCredentialProvider::keypair_jwt(token)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_headers_and_returns_body() {
        let server = MockServer::start().await;
        let body = "event: message.delta\ndata: {\"delta\":{\"content\":[{\"type\":\"text\",\"text\":\"ok\"}]}}\n";
        Mock::given(method("POST"))
            .and(path("/api/v2/cortex/agent:run"))
            .and(header("authorization", "Bearer jwt-123"))
            .and(header("x-snowflake-authorization-token-type", "KEYPAIR_JWT"))
            .and(body_partial_json(serde_json::json!({
                "tool_choice": {"type": "auto"},
                "messages": [{"role": "user"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server, "jwt-123").send(&request()).await.unwrap();
        assert_eq!(text, body);
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": "390144",
                "message": "JWT token is invalid."
            })))
            .mount(&server)
            .await;

        let err = client(&server, "bad").send(&request()).await.unwrap_err();
        assert_matches!(err, AgentError::Api { status: 401, ref message, ref code }
            if message == "JWT token is invalid." && code.as_deref() == Some("390144"));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server, "").send(&request()).await.unwrap_err();
        assert_eq!(err.category(), "auth");
    }
}
