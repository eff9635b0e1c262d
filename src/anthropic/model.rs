use crate::{
    anthropic::api::{ContentBlock, CreateMessageParams, InputMessage, Message},
    client_utils,
    errors::{GenerationError, GenerationResult},
    model::{GenerateRequest, GenerativeModel},
};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use std::time::Duration;

const PROVIDER: &str = "anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_API_VERSION: &str = "2023-06-01";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Fixed model used for website generation and content analysis.
pub const DEFAULT_MODEL_ID: &str = "claude-3-5-sonnet-20241022";

/// Generation client backed by the Anthropic Messages API. One HTTPS
/// request per call, no retries.
pub struct AnthropicModel {
    model_id: String,
    api_key: String,
    base_url: String,
    api_version: String,
    client: Client,
    timeout: Option<Duration>,
}

#[derive(Clone, Default)]
pub struct AnthropicModelOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub client: Option<Client>,
    /// Caller-supplied bound on the model call. On expiry the failure
    /// surfaces as a transport error so callers route to the fallback
    /// renderer instead of hanging.
    pub timeout: Option<Duration>,
}

impl AnthropicModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, mut options: AnthropicModelOptions) -> Self {
        let base_url = options
            .base_url
            .take()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let api_version = options
            .api_version
            .take()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let client = options.client.take().unwrap_or_default();

        Self {
            model_id: model_id.into(),
            api_key: options.api_key,
            base_url,
            api_version,
            client,
            timeout: options.timeout,
        }
    }

    /// Construct the default model from `ANTHROPIC_API_KEY`. A missing
    /// key is an authentication failure, reported before any network
    /// traffic happens.
    pub fn from_env() -> GenerationResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            GenerationError::Unauthenticated(format!("{API_KEY_ENV} is not configured"))
        })?;
        Ok(Self::new(
            DEFAULT_MODEL_ID,
            AnthropicModelOptions {
                api_key,
                ..AnthropicModelOptions::default()
            },
        ))
    }

    fn request_headers(&self) -> GenerationResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).map_err(|error| {
                GenerationError::InvalidInput(format!("Invalid API key header value: {error}"))
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.api_version).map_err(|error| {
                GenerationError::InvalidInput(format!("Invalid version header value: {error}"))
            })?,
        );

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl GenerativeModel for AnthropicModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate_text(&self, request: GenerateRequest) -> GenerationResult<String> {
        let params = CreateMessageParams {
            model: self.model_id.clone(),
            max_tokens: request.max_tokens,
            temperature: Some(request.temperature),
            messages: vec![InputMessage::user(request.prompt)],
        };

        let headers = self.request_headers()?;
        let url = format!("{}/v1/messages", self.base_url);

        let response: Message =
            client_utils::send_json(&self.client, &url, &params, headers, self.timeout, PROVIDER)
                .await?;

        let text = response
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse(PROVIDER));
        }

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = response.stop_reason.as_deref().unwrap_or("unknown"),
                "model call completed"
            );
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let model = AnthropicModel::new(
            DEFAULT_MODEL_ID,
            AnthropicModelOptions {
                api_key: "key".into(),
                base_url: Some("https://proxy.example.com/".into()),
                ..AnthropicModelOptions::default()
            },
        );
        assert_eq!(model.base_url, "https://proxy.example.com");
        assert_eq!(model.model_id(), DEFAULT_MODEL_ID);
        assert_eq!(model.provider(), "anthropic");
    }

    #[test]
    fn invalid_api_key_header_is_rejected() {
        let model = AnthropicModel::new(
            DEFAULT_MODEL_ID,
            AnthropicModelOptions {
                api_key: "bad\nkey".into(),
                ..AnthropicModelOptions::default()
            },
        );
        let error = model.request_headers().unwrap_err();
        assert_eq!(error.kind(), "invalid_input");
    }
}
