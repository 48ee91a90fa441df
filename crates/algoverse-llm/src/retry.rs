//! Shared retry loop for HTTP providers

use crate::LlmError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Most attempts a provider may be configured with
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Longest pause between two attempts
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Pause after the `attempt`-th failure: 1s, 2s, 4s, ... capped at [`MAX_BACKOFF`]
fn backoff(attempt: u32) -> Duration {
    let secs = 2u64
        .checked_pow(attempt.saturating_sub(1))
        .unwrap_or(u64::MAX);
    Duration::from_secs(secs).min(MAX_BACKOFF)
}

/// Run `attempt` up to `max_attempts` times (clamped to
/// `1..=MAX_ATTEMPTS_LIMIT`), backing off between transient failures.
/// Non-transient errors return immediately.
pub(crate) async fn with_retries<F, Fut>(
    provider: &str,
    max_attempts: u32,
    mut attempt: F,
) -> Result<String, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, LlmError>>,
{
    let max_attempts = max_attempts.clamp(1, MAX_ATTEMPTS_LIMIT);
    let mut attempts = 0;

    loop {
        attempts += 1;
        match attempt().await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempts < max_attempts => {
                warn!(
                    "{} attempt {}/{} failed: {}",
                    provider, attempts, max_attempts, e
                );
                tokio::time::sleep(backoff(attempts)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
