use crate::errors::GenerationResult;

/// Parameters for one text generation call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Full prompt text, sent as a single user message.
    pub prompt: String,
    /// Low and fixed for consistent output; this pipeline never samples
    /// for variety.
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A hosted generative model. One blocking call per request, no
/// retries: callers are expected to fall back rather than retry, since
/// retrying an oversized or malformed prompt reproduces the failure.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    /// Generate free text for the request. Must not mutate shared state
    /// beyond the network call itself.
    async fn generate_text(&self, request: GenerateRequest) -> GenerationResult<String>;
}
