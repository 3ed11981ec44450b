//! Retry policy shared by the HTTP-backed providers.

use std::future::Future;
use std::time::Duration;

use crate::ports::{AIError, CompletionRequest, CompletionResponse};

/// Delay before retry number `retry` (0-based): base, 2x base, 4x base, ...
pub(super) fn backoff_delay(base: Duration, retry: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(retry))
}

/// Runs `attempt` until it succeeds, fails permanently, or retries run out.
///
/// A rate limit whose hint asks for a longer wait than the next backoff step
/// is returned to the caller instead of being retried early.
pub(super) async fn complete_with_retries<F, Fut>(
    provider: &'static str,
    request: &CompletionRequest,
    max_retries: u32,
    base_delay: Duration,
    mut attempt: F,
) -> Result<CompletionResponse, AIError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<CompletionResponse, AIError>>,
{
    let mut retry = 0;

    loop {
        let err = match attempt().await {
            Ok(completion) => return Ok(completion),
            Err(err) => err,
        };

        if !err.is_retryable() || retry >= max_retries {
            return Err(err);
        }

        let delay = backoff_delay(base_delay, retry);
        if let AIError::RateLimited { retry_after_secs } = err {
            if Duration::from_secs(u64::from(retry_after_secs)) > delay {
                tracing::warn!(
                    provider,
                    request_id = %request.metadata.request_id,
                    operation = %request.metadata.operation,
                    retry_after_secs,
                    "rate limited beyond the retry window, giving up"
                );
                return Err(err);
            }
        }

        tracing::warn!(
            provider,
            request_id = %request.metadata.request_id,
            operation = %request.metadata.operation,
            attempt = retry + 1,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "provider request failed, retrying"
        );
        tokio::time::sleep(delay).await;
        retry += 1;
    }
}
