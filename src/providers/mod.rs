//! Client implementations for the managed Bedrock services.
//!
//! [`BedrockRuntimeClient`] speaks `InvokeModel`, [`KnowledgeBaseClient`]
//! speaks knowledge base `Retrieve`. The retry decorators in [`retry`]
//! wrap either one.

pub mod bedrock;
mod http;
pub mod knowledge_base;
pub mod retry;

pub use bedrock::{BedrockRuntimeClient, runtime_endpoint};
pub use http::DEFAULT_TIMEOUT;
pub use knowledge_base::{KnowledgeBaseClient, agent_runtime_endpoint};
pub use retry::{RetryConfig, RetryingInferenceClient, RetryingRetrievalClient};
