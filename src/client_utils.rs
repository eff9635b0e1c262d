use crate::errors::{GenerationError, GenerationResult};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Create a JSON request, parse the response.
/// Classifies non-success status codes into the error taxonomy.
pub async fn send_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    headers: reqwest::header::HeaderMap,
    timeout: Option<Duration>,
    provider: &'static str,
) -> GenerationResult<R> {
    let mut request = client.post(url).headers(headers).json(data);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status, body, provider));
    }

    response.json::<R>().await.map_err(|error| {
        GenerationError::InvalidResponse(provider, format!("failed to decode body: {error}"))
    })
}

/// Map an HTTP status onto the error taxonomy: auth failures and quota
/// exhaustion get their own kinds so callers can report them; anything
/// else unexpected is an invalid response.
pub fn classify_status(
    status: StatusCode,
    body: String,
    provider: &'static str,
) -> GenerationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Unauthenticated(body),
        StatusCode::PAYMENT_REQUIRED | StatusCode::TOO_MANY_REQUESTS => {
            GenerationError::QuotaExceeded(body)
        }
        _ => GenerationError::InvalidResponse(
            provider,
            format!("unexpected status {status}: {body}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_classify_as_unauthenticated() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let error = classify_status(status, "invalid x-api-key".into(), "anthropic");
            assert_eq!(error.kind(), "unauthenticated");
        }
    }

    #[test]
    fn quota_statuses_classify_as_quota_exceeded() {
        for status in [StatusCode::TOO_MANY_REQUESTS, StatusCode::PAYMENT_REQUIRED] {
            let error = classify_status(status, "rate limited".into(), "anthropic");
            assert_eq!(error.kind(), "quota_exceeded");
        }
    }

    #[test]
    fn other_statuses_classify_as_invalid_response() {
        let error = classify_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "overloaded".into(),
            "anthropic",
        );
        assert_eq!(error.kind(), "invalid_response");
    }
}
