//! Shared HTTP response helpers for the Azure OpenAI clients.
//!
//! Both the embedding client and the external intent classifier talk to the
//! same service, so status handling lives here once and each crate maps it
//! onto its own error type through [`ServiceError`].

use crate::error::EmbeddingError;

/// Error types that can represent a rejected service response.
pub trait ServiceError {
    /// The service answered 429 and asked the caller to wait.
    fn rate_limited(retry_after_secs: u64) -> Self;

    /// The service answered with any other non-success status.
    fn api(status: u16, message: String) -> Self;
}

impl ServiceError for EmbeddingError {
    fn rate_limited(retry_after_secs: u64) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    fn api(status: u16, message: String) -> Self {
        Self::Api { status, message }
    }
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`ServiceError::rate_limited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Non-success status** → [`ServiceError::api`] with status code and
///   response body.
///
/// # Errors
///
/// Returns `E` built from the status when the response is not a success.
pub async fn check_response<E: ServiceError>(
    resp: reqwest::Response,
) -> Result<reqwest::Response, E> {
    if resp.status() == 429 {
        return Err(E::rate_limited(parse_retry_after(&resp)));
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        return Err(E::api(status, resp.text().await.unwrap_or_default()));
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
