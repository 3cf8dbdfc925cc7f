use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::errors::{PipelineError, ProviderError};
use crate::models::Photo;
use crate::services::ai::extract::parse_json_reply;
use crate::services::ai::LlmProvider;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const CONNECTION_PROMPT: &str = "Reply with the words 'BuildSight AI is ready!' if you can read this.";

/// Validate → prompt → provider call → JSON extraction → typed result.
///
/// Holds no per-request state: clones share the provider and calls run
/// independently. The operations live in `services::{estimate, materials,
/// analysis}`.
#[derive(Clone)]
pub struct EstimatePipeline {
    llm: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl EstimatePipeline {
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.llm.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a trivial prompt and reports whether the provider answered.
    pub async fn check_connection(&self) -> bool {
        match self.call(CONNECTION_PROMPT, None).await {
            Ok(reply) => {
                tracing::info!(
                    provider = self.provider_name(),
                    reply = %truncate(&reply, 80),
                    "provider connection check succeeded"
                );
                true
            }
            Err(e) => {
                tracing::warn!(provider = self.provider_name(), error = %e, "provider connection check failed");
                false
            }
        }
    }

    /// One provider call, bounded by the configured timeout.
    pub(crate) async fn call(
        &self,
        prompt: &str,
        image: Option<&Photo>,
    ) -> Result<String, PipelineError> {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.llm.generate_text(prompt, image)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Err(_) => {
                tracing::warn!(
                    provider = self.provider_name(),
                    timeout_secs = self.timeout.as_secs_f64(),
                    "provider call timed out"
                );
                Err(ProviderError::Timeout(self.timeout).into())
            }
            Ok(Err(e)) => {
                tracing::warn!(provider = self.provider_name(), elapsed_ms, error = %format!("{e:#}"), "provider call failed");
                Err(ProviderError::Transport(e).into())
            }
            Ok(Ok(reply)) => {
                tracing::debug!(provider = self.provider_name(), elapsed_ms, reply_len = reply.len(), "provider replied");
                Ok(reply)
            }
        }
    }

    pub(crate) fn parse<T: DeserializeOwned>(&self, reply: &str) -> Result<T, PipelineError> {
        parse_json_reply(reply).inspect_err(|e| {
            tracing::warn!(
                error = %e,
                raw = %truncate(reply, 500),
                "could not parse provider reply"
            );
        })
    }
}

/// Runs `operation` until it finishes or `token` is cancelled.
///
/// On cancellation the operation future is dropped, which aborts any
/// in-flight HTTP request, and `PipelineError::Cancelled` is returned.
pub async fn with_cancellation<T, F>(
    token: &CancellationToken,
    operation: F,
) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::info!("request cancelled by caller");
            Err(PipelineError::Cancelled)
        }
        result = operation => result,
    }
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Küchenumbau", 3), "Küc");
        assert_eq!(truncate("short", 80), "short");
    }

    #[tokio::test]
    async fn test_with_cancellation_passes_result_through() {
        let token = CancellationToken::new();
        let result = with_cancellation(&token, async { Ok::<_, PipelineError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_operation() {
        let token = CancellationToken::new();
        token.cancel();
        let polled = std::sync::atomic::AtomicBool::new(false);
        let result = with_cancellation(&token, async {
            polled.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok::<_, PipelineError>(())
        })
        .await;
        assert!(matches!(result, Err(PipelineError::Cancelled)));
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
    }
}
