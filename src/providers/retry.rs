//! Retry configuration, delay calculation, and client decorators.
//!
//! Provides [`RetryConfig`] for controlling retry behaviour and
//! `Retrying*Client` decorators that wrap the client traits with
//! automatic retry on transient errors.
//!
//! Both decorators delegate to the shared `with_retry()` helper,
//! keeping retry logic in a single place.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::warn;

use crate::telemetry;
use crate::traits::{InferenceClient, RetrievalClient};
use crate::types::{InvokeRequest, InvokeResponse, RetrieveRequest, RetrieveResponse};
use crate::{GateError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// Uses exponential backoff with optional jitter:
///
/// ```rust
/// # use bedrock_gate::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200))
///     .jitter(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 30s.
    pub max_delay: Duration,
    /// Whether to add random jitter to delays. Default: true.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Whether this config ever retries.
    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enable or disable jitter.
    pub fn jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    ///
    /// Uses exponential backoff: `initial_delay * 2^attempt`, capped at `max_delay`.
    /// Does NOT include jitter; see [`effective_delay()`](Self::effective_delay)
    /// for the full calculation.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Calculate the effective delay, respecting service `retry_after` hints.
    ///
    /// A `retry_after` hint (from a `RateLimited` error) takes precedence
    /// over the calculated backoff and is never jittered. Otherwise, with
    /// jitter enabled, the backoff is scaled by a random factor in `[0.5, 1.0]`.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(hint) = retry_after {
            return hint;
        }
        let delay = self.delay_for_attempt(attempt);
        if self.jitter {
            delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
        } else {
            delay
        }
    }
}

// ============================================================================
// Shared retry helper
// ============================================================================

/// Execute an async operation with retry logic.
///
/// Retries on transient errors (as classified by [`GateError::is_transient()`])
/// up to `config.max_attempts`, using exponential backoff and respecting
/// `retry_after` hints from `RateLimited` errors.
///
/// Permanent errors are returned immediately without retry.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    client_name: &str,
    operation: &str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.max_attempts.max(1);
    let mut last_err = None;
    for attempt in 0..attempts {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt + 1 < attempts {
                    metrics::counter!(telemetry::RETRIES_TOTAL,
                        "client" => client_name.to_owned(),
                        "operation" => operation.to_owned(),
                    )
                    .increment(1);
                    let delay = config.effective_delay(attempt, e.retry_after());
                    warn!(
                        client = client_name,
                        operation,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e), // permanent error, no retry
        }
    }
    Err(last_err.unwrap_or_else(|| {
        GateError::Configuration("retry loop finished without an attempt".to_string())
    }))
}

// ============================================================================
// RetryingInferenceClient
// ============================================================================

/// Decorator that wraps an [`InferenceClient`] with retry logic.
///
/// On transient errors (as classified by [`GateError::is_transient()`]),
/// retries with exponential backoff up to `config.max_attempts`. Respects
/// `retry_after` hints from `RateLimited` errors. Permanent errors are
/// returned immediately.
pub struct RetryingInferenceClient {
    inner: Arc<dyn InferenceClient>,
    config: RetryConfig,
}

impl RetryingInferenceClient {
    /// Wrap an inference client with retry logic.
    pub fn new(inner: Arc<dyn InferenceClient>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl InferenceClient for RetryingInferenceClient {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke_model(
        &self,
        model_id: &str,
        request: &InvokeRequest,
    ) -> Result<InvokeResponse> {
        with_retry(&self.config, self.inner.name(), "invoke_model", || {
            self.inner.invoke_model(model_id, request)
        })
        .await
    }
}

// ============================================================================
// RetryingRetrievalClient
// ============================================================================

/// Decorator that wraps a [`RetrievalClient`] with retry logic.
///
/// Same semantics as [`RetryingInferenceClient`].
pub struct RetryingRetrievalClient {
    inner: Arc<dyn RetrievalClient>,
    config: RetryConfig,
}

impl RetryingRetrievalClient {
    /// Wrap a retrieval client with retry logic.
    pub fn new(inner: Arc<dyn RetrievalClient>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl RetrievalClient for RetryingRetrievalClient {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn retrieve(&self, kb_id: &str, request: &RetrieveRequest) -> Result<RetrieveResponse> {
        with_retry(&self.config, self.inner.name(), "retrieve", || {
            self.inner.retrieve(kb_id, request)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_exponentially_and_caps() {
        let config = RetryConfig::new()
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_millis(350));
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(350));
        assert_eq!(config.delay_for_attempt(40), Duration::from_millis(350));
    }

    #[test]
    fn retry_after_hint_wins() {
        let config = RetryConfig::new();
        assert_eq!(
            config.effective_delay(0, Some(Duration::from_secs(7))),
            Duration::from_secs(7)
        );
    }

    #[test]
    fn jitter_stays_within_half_to_full_delay() {
        let config = RetryConfig::new().initial_delay(Duration::from_millis(400));
        for _ in 0..50 {
            let d = config.effective_delay(0, None);
            assert!(d >= Duration::from_millis(200) && d <= Duration::from_millis(400));
        }
        let fixed = config.jitter(false);
        assert_eq!(fixed.effective_delay(0, None), Duration::from_millis(400));
    }

    #[test]
    fn disabled_is_single_attempt() {
        assert_eq!(RetryConfig::disabled().max_attempts, 1);
        assert!(!RetryConfig::disabled().is_enabled());
        assert!(RetryConfig::default().is_enabled());
    }
}
