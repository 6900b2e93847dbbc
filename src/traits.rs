//! Client seams for the managed inference and retrieval services.
//!
//! Everything the gate does remotely goes through these two traits. The
//! HTTP implementations live in [`crate::providers`]; tests substitute
//! their own doubles.

use async_trait::async_trait;

use crate::Result;
use crate::types::{InvokeRequest, InvokeResponse, RetrieveRequest, RetrieveResponse};

/// Hosted model inference (Bedrock `InvokeModel`).
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Client name for logging/debugging.
    fn name(&self) -> &str;

    /// Send one request body to `model_id` and decode the response body.
    async fn invoke_model(&self, model_id: &str, request: &InvokeRequest)
    -> Result<InvokeResponse>;
}

/// Hosted vector knowledge base (Bedrock Agent `Retrieve`).
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Client name for logging/debugging.
    fn name(&self) -> &str;

    /// Run a retrieval query against knowledge base `kb_id`.
    async fn retrieve(&self, kb_id: &str, request: &RetrieveRequest) -> Result<RetrieveResponse>;
}
