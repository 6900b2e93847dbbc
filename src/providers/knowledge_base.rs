//! Bedrock Agent Runtime client for knowledge base `Retrieve`.
//!
//! See: <https://docs.aws.amazon.com/bedrock/latest/APIReference/API_agent-runtime_Retrieve.html>

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;
use crate::traits::RetrievalClient;
use crate::types::{RetrieveRequest, RetrieveResponse};
use super::http::{DEFAULT_TIMEOUT, HttpTransport};

/// Bedrock Agent Runtime endpoint for a region.
pub fn agent_runtime_endpoint(region: &str) -> String {
    format!("https://bedrock-agent-runtime.{region}.amazonaws.com")
}

/// Client for the Bedrock Agent Runtime `Retrieve` operation.
#[derive(Clone)]
pub struct KnowledgeBaseClient {
    transport: HttpTransport,
}

impl KnowledgeBaseClient {
    /// Create a client for the regional endpoint.
    pub fn new(region: &str, api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(agent_runtime_endpoint(region), api_key)
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
impl RetrievalClient for KnowledgeBaseClient {
    fn name(&self) -> &str {
        "bedrock-agent-runtime"
    }

    async fn retrieve(&self, kb_id: &str, request: &RetrieveRequest) -> Result<RetrieveResponse> {
        self.transport
            .post_json(&["knowledgebases", kb_id, "retrieve"], request, kb_id)
            .await
    }
}
