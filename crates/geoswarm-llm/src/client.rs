//! HTTP client for the chat-completions endpoint.
//!
//! Wraps `reqwest` with typed errors, bearer-key auth, and structured-output
//! handling. Every call carries the configured timeout — a hung upstream
//! call fails the request rather than stalling a campaign run forever.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::LlmError;
use crate::types::{
    ApiErrorEnvelope, ChatMessage, ChatRequest, ChatResponse, JsonSchemaSpec, ResponseFormat,
};

const COMPLETIONS_PATH: &str = "v1/chat/completions";

/// Client for an OpenAI-compatible chat-completions API.
///
/// Use [`LlmClient::new`] for production or point `base_url` at a wiremock
/// server in tests.
pub struct LlmClient {
    client: Client,
    base_url: Url,
    api_key: String,
    model: String,
}

impl LlmClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`LlmError::Api`] if `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("geoswarm/0.1 (campaign-orchestration)")
            .build()?;

        // Normalise: exactly one trailing slash so join() appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| LlmError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        })
    }

    /// Sends one completion request and returns the raw text content.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] on transport failure or timeout.
    /// - [`LlmError::RateLimited`] on 429.
    /// - [`LlmError::Api`] on any other non-success status (carrying the
    ///   service's own message when the body has an error envelope).
    /// - [`LlmError::Malformed`] if the body is not a valid completion.
    /// - [`LlmError::EmptyCompletion`] if no content came back.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.complete(system, user, None).await
    }

    /// Sends one completion request constrained to the given JSON schema and
    /// parses the content as JSON.
    ///
    /// # Errors
    ///
    /// As [`LlmClient::chat`]; additionally [`LlmError::Malformed`] if the
    /// content is not valid JSON despite the schema constraint.
    pub async fn chat_structured(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value, LlmError> {
        let format = ResponseFormat::JsonSchema {
            json_schema: JsonSchemaSpec {
                name: schema_name.to_owned(),
                strict: true,
                schema,
            },
        };
        let content = self.complete(system, user, Some(format)).await?;

        serde_json::from_str(&content).map_err(|e| LlmError::Malformed {
            context: format!("structured completion '{schema_name}'"),
            source: e,
        })
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, LlmError> {
        let url = self
            .base_url
            .join(COMPLETIONS_PATH)
            .map_err(|e| LlmError::Api(format!("invalid completions URL: {e}")))?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            response_format,
        };

        tracing::debug!(
            model = %self.model,
            structured = request.response_format.is_some(),
            "sending completion request"
        );

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        tracing::debug!(status = %response.status(), "completion response received");

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }
        if !response.status().is_success() {
            // Prefer the service's own message when the body carries one.
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
                return Err(LlmError::Api(envelope.error.message));
            }
            return Err(LlmError::Api(format!(
                "completion request failed with status {status}"
            )));
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed {
                context: url.to_string(),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }
}
