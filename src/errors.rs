use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    /// The document or settings were rejected before normalization.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The API key is missing or was rejected by the provider.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    /// The provider rate-limited the request or the account has no
    /// remaining credits.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),
    /// The request to the provider failed in transit (network error or
    /// timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The model returned no text.
    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),
    /// The response from the provider had an unexpected shape (e.g. no
    /// content blocks, undecodable body, unexpected status).
    #[error("Invalid response from {0}: {1}")]
    InvalidResponse(&'static str, String),
}

impl GenerationError {
    /// Stable kind label used for logging and failure classification.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::Transport(_) => "transport",
            Self::EmptyResponse(_) => "empty_response",
            Self::InvalidResponse(..) => "invalid_response",
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;
