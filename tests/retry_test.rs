use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bedrock_gate::providers::retry::{RetryConfig, RetryingInferenceClient, RetryingRetrievalClient};
use bedrock_gate::{
    GateError, InferenceClient, InvokeRequest, InvokeResponse, Result, RetrievalClient,
    RetrievalPassage, RetrieveRequest, RetrieveResponse, SamplingParams,
};

/// Mock client that fails N times then succeeds.
struct FailThenSucceed {
    fail_count: AtomicU32,
    fail_with: fn() -> GateError,
    total_calls: AtomicU32,
}

impl FailThenSucceed {
    fn new(failures: u32, fail_with: fn() -> GateError) -> Self {
        Self {
            fail_count: AtomicU32::new(failures),
            fail_with,
            total_calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.total_calls.load(Ordering::Relaxed)
    }

    fn next(&self) -> Result<()> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        let remaining = self.fail_count.load(Ordering::Relaxed);
        if remaining > 0 {
            self.fail_count.fetch_sub(1, Ordering::Relaxed);
            return Err((self.fail_with)());
        }
        Ok(())
    }
}

#[async_trait]
impl InferenceClient for FailThenSucceed {
    fn name(&self) -> &str {
        "mock-retry"
    }

    async fn invoke_model(
        &self,
        _model_id: &str,
        _request: &InvokeRequest,
    ) -> Result<InvokeResponse> {
        self.next()?;
        Ok(InvokeResponse::from_text("Category E"))
    }
}

#[async_trait]
impl RetrievalClient for FailThenSucceed {
    fn name(&self) -> &str {
        "mock-retry"
    }

    async fn retrieve(&self, _kb_id: &str, _request: &RetrieveRequest) -> Result<RetrieveResponse> {
        self.next()?;
        Ok(RetrieveResponse {
            retrieval_results: vec![RetrievalPassage::from_text("ok")],
            next_token: None,
        })
    }
}

fn request() -> InvokeRequest {
    InvokeRequest::user_text("hello", SamplingParams::CLASSIFIER)
}

fn fast() -> RetryConfig {
    RetryConfig::new()
        .max_attempts(3)
        .initial_delay(Duration::from_millis(1))
        .jitter(false)
}

#[tokio::test]
async fn retries_on_transient_error_then_succeeds() {
    let inner = Arc::new(FailThenSucceed::new(2, || GateError::RateLimited {
        retry_after: None,
    }));
    let client = RetryingInferenceClient::new(inner.clone(), fast());

    let result = client.invoke_model("m", &request()).await;

    assert!(result.is_ok());
    assert_eq!(inner.call_count(), 3); // 2 failures + 1 success
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let inner = Arc::new(FailThenSucceed::new(10, || GateError::Http("timeout".into())));
    let client = RetryingInferenceClient::new(inner.clone(), fast());

    let result = client.invoke_model("m", &request()).await;

    assert!(matches!(result, Err(GateError::Http(_))));
    assert_eq!(inner.call_count(), 3);
}

#[tokio::test]
async fn does_not_retry_permanent_errors() {
    let inner = Arc::new(FailThenSucceed::new(1, || {
        GateError::AuthenticationFailed("expired token".into())
    }));
    let client = RetryingInferenceClient::new(
        inner.clone(),
        RetryConfig::new()
            .max_attempts(5)
            .initial_delay(Duration::from_millis(1)),
    );

    let result = client.invoke_model("m", &request()).await;

    assert!(result.is_err());
    assert_eq!(inner.call_count(), 1); // no retry
}

#[tokio::test(start_paused = true)]
async fn respects_retry_after_duration() {
    let inner = Arc::new(FailThenSucceed::new(1, || GateError::RateLimited {
        retry_after: Some(Duration::from_secs(5)),
    }));
    let client = RetryingInferenceClient::new(
        inner.clone(),
        RetryConfig::new()
            .max_attempts(2)
            .initial_delay(Duration::from_millis(1))
            .jitter(false),
    );

    let start = tokio::time::Instant::now();
    let result = client.invoke_model("m", &request()).await;

    assert!(result.is_ok());
    // Waited the hinted 5s, not the 1ms initial delay.
    assert!(start.elapsed() >= Duration::from_secs(5));
}

#[tokio::test]
async fn disabled_config_no_retry() {
    let inner = Arc::new(FailThenSucceed::new(1, || GateError::RateLimited {
        retry_after: None,
    }));
    let client = RetryingInferenceClient::new(inner.clone(), RetryConfig::disabled());

    let result = client.invoke_model("m", &request()).await;

    assert!(result.is_err());
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn zero_attempts_still_tries_once() {
    let inner = Arc::new(FailThenSucceed::new(0, || GateError::EmptyResponse));
    let client = RetryingInferenceClient::new(inner.clone(), RetryConfig::new().max_attempts(0));

    assert!(client.invoke_model("m", &request()).await.is_ok());
    assert_eq!(inner.call_count(), 1);
}

// ============================================================================
// Retrieval retry tests
// ============================================================================

#[tokio::test]
async fn retrieval_retries_server_errors() {
    let inner = Arc::new(FailThenSucceed::new(1, || GateError::Api {
        status: 502,
        message: "bad gateway".into(),
    }));
    let client = RetryingRetrievalClient::new(inner.clone(), fast());

    let response = client
        .retrieve("kb", &RetrieveRequest::new("q", 3))
        .await
        .unwrap();

    assert_eq!(response.retrieval_results.len(), 1);
    assert_eq!(inner.call_count(), 2);
}

#[tokio::test]
async fn retrieval_keeps_validation_errors() {
    let inner = Arc::new(FailThenSucceed::new(1, || {
        GateError::Validation("query too long".into())
    }));
    let client = RetryingRetrievalClient::new(inner.clone(), fast());

    let err = client
        .retrieve("kb", &RetrieveRequest::new("q", 3))
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Validation(_)));
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn decorator_keeps_inner_name() {
    let inner = Arc::new(FailThenSucceed::new(0, || GateError::EmptyResponse));
    let client = RetryingRetrievalClient::new(inner, fast());
    assert_eq!(RetrievalClient::name(&client), "mock-retry");
}
