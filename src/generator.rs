//! Answer generation.
//!
//! The raw prompt goes to the model as a single user message, with no
//! rubric, a 500-token budget, and caller-chosen temperature and top_p.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::Result;
use crate::telemetry;
use crate::traits::InferenceClient;
use crate::types::{InvokeRequest, SamplingParams};

/// One generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model_id: String,
    pub params: SamplingParams,
}

impl GenerationRequest {
    /// Request with the standard generation budget.
    pub fn new(
        prompt: impl Into<String>,
        model_id: impl Into<String>,
        temperature: f32,
        top_p: f32,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
            params: SamplingParams::generation(temperature, top_p),
        }
    }

    /// InvokeModel body for this request.
    pub fn to_invoke_request(&self) -> InvokeRequest {
        InvokeRequest::user_text(self.prompt.clone(), self.params)
    }
}

/// Generates answers with one model.
#[derive(Clone)]
pub struct ResponseGenerator {
    client: Arc<dyn InferenceClient>,
    model_id: String,
}

impl ResponseGenerator {
    pub fn new(client: Arc<dyn InferenceClient>, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// Model used for generation.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Generate an answer to `prompt`.
    ///
    /// `temperature` and `top_p` must lie within `[0, 1]`; out-of-range
    /// values fail with `InvalidInput` before anything is sent.
    #[instrument(skip(self, prompt), fields(operation = "generate", model = %self.model_id))]
    pub async fn generate(&self, prompt: &str, temperature: f32, top_p: f32) -> Result<String> {
        generate_with(
            self.client.as_ref(),
            &GenerationRequest::new(prompt, self.model_id.clone(), temperature, top_p),
        )
        .await
    }

    /// Like [`generate`](Self::generate), but logs errors and returns `""`.
    pub async fn generate_or_empty(&self, prompt: &str, temperature: f32, top_p: f32) -> String {
        generate_response(self.client.as_ref(), prompt, &self.model_id, temperature, top_p).await
    }
}

/// Run one generation request through `client`.
pub async fn generate_with(
    client: &dyn InferenceClient,
    request: &GenerationRequest,
) -> Result<String> {
    request.params.validate()?;

    let start = Instant::now();
    let body = request.to_invoke_request();
    let result = client
        .invoke_model(&request.model_id, &body)
        .await
        .and_then(|response| {
            if let Some(usage) = &response.usage {
                telemetry::record_token_usage("generate", usage);
            }
            let text = response.first_text()?.to_string();
            debug!(
                chars = text.len(),
                stop_reason = response.stop_reason.as_deref().unwrap_or("unknown"),
                "response generated"
            );
            Ok(text)
        });

    telemetry::record_request("generate", start, result.is_ok());
    result
}

/// Lenient generation: the model's text, or `""` on error.
pub async fn generate_response(
    client: &dyn InferenceClient,
    prompt: &str,
    model_id: &str,
    temperature: f32,
    top_p: f32,
) -> String {
    let request = GenerationRequest::new(prompt, model_id, temperature, top_p);
    match generate_with(client, &request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(
                client = client.name(),
                error = %e,
                kind = ?e.kind(),
                "error generating response; returning empty text"
            );
            String::new()
        }
    }
}
