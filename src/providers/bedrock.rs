//! Bedrock Runtime client for `InvokeModel`.
//!
//! See: <https://docs.aws.amazon.com/bedrock/latest/APIReference/API_runtime_InvokeModel.html>

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;
use crate::traits::InferenceClient;
use crate::types::{InvokeRequest, InvokeResponse};
use super::http::{DEFAULT_TIMEOUT, HttpTransport};

/// Bedrock Runtime endpoint for a region.
pub fn runtime_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

/// Client for the Bedrock Runtime `InvokeModel` operation.
///
/// Authenticates with a Bedrock API key sent as a bearer token. Without a
/// key no `Authorization` header is sent, which suits a signing proxy.
#[derive(Clone)]
pub struct BedrockRuntimeClient {
    transport: HttpTransport,
}

impl BedrockRuntimeClient {
    /// Create a client for the regional endpoint.
    pub fn new(region: &str, api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(runtime_endpoint(region), api_key)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom base URL and request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(base_url, api_key, timeout)?,
        })
    }

    /// Endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

#[async_trait]
impl InferenceClient for BedrockRuntimeClient {
    fn name(&self) -> &str {
        "bedrock-runtime"
    }

    async fn invoke_model(
        &self,
        model_id: &str,
        request: &InvokeRequest,
    ) -> Result<InvokeResponse> {
        self.transport
            .post_json(&["model", model_id, "invoke"], request, model_id)
            .await
    }
}
