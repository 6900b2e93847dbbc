//! Topic gate.
//!
//! Wraps the user's text in a fixed five-category rubric, asks the model
//! for a single label with near-greedy sampling, and decodes the label
//! into a [`Category`]. Only [`Category::E`] (heavy machinery) lets a
//! prompt through.
//!
//! Two entry points:
//! - [`PromptClassifier::classify`] surfaces every failure as a
//!   [`GateError`](crate::GateError) and unknown labels as
//!   [`Category::Unrecognized`].
//! - [`PromptClassifier::is_allowed`] collapses everything that is not a
//!   clean `Category E` into `false`, logging the reason.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::Result;
use crate::telemetry;
use crate::traits::InferenceClient;
use crate::types::{Category, InvokeRequest, SamplingParams};

const RUBRIC_HEADER: &str = "Human: Classify the provided user request into one of the following categories. Evaluate the user request against each category. Once the user category has been selected with high confidence return the answer.";

const RUBRIC_FOOTER: &str = "ONLY ANSWER with the Category letter, such as the following output example:

Category B

Assistant:";

/// Render the classification rubric around `prompt`.
///
/// The user text sits between `<user_request>` tags; it is inserted
/// verbatim, so tags inside the prompt are not escaped.
pub fn rubric_prompt(prompt: &str) -> String {
    let mut rubric = String::with_capacity(RUBRIC_HEADER.len() + prompt.len() + 1024);
    rubric.push_str(RUBRIC_HEADER);
    rubric.push('\n');
    for category in Category::KNOWN {
        rubric.push_str(&format!("{category}: {}\n", category.description()));
    }
    rubric.push_str("<user_request>\n");
    rubric.push_str(prompt);
    rubric.push_str("\n</user_request>\n");
    rubric.push_str(RUBRIC_FOOTER);
    rubric
}

/// One classification call: raw user text plus the model to ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub prompt: String,
    pub model_id: String,
}

impl ClassificationRequest {
    pub fn new(prompt: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
        }
    }

    /// InvokeModel body: the rubric as a single user message, fixed sampling.
    pub fn to_invoke_request(&self) -> InvokeRequest {
        InvokeRequest::user_text(rubric_prompt(&self.prompt), SamplingParams::CLASSIFIER)
    }
}

/// Classifies prompts against the heavy-machinery rubric.
#[derive(Clone)]
pub struct PromptClassifier {
    client: Arc<dyn InferenceClient>,
    model_id: String,
}

impl PromptClassifier {
    pub fn new(client: Arc<dyn InferenceClient>, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// Model used for classification.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Classify `prompt`, surfacing transport and response-shape errors.
    #[instrument(skip(self, prompt), fields(operation = "classify", model = %self.model_id))]
    pub async fn classify(&self, prompt: &str) -> Result<Category> {
        classify_with(self.client.as_ref(), prompt, &self.model_id).await
    }

    /// `true` only when the model answers exactly `Category E`.
    ///
    /// Errors are logged and reported as `false`, so a service outage
    /// looks the same as an off-topic prompt.
    pub async fn is_allowed(&self, prompt: &str) -> bool {
        valid_prompt(self.client.as_ref(), prompt, &self.model_id).await
    }
}

/// Classify `prompt` with `model_id` through `client`.
pub async fn classify_with(
    client: &dyn InferenceClient,
    prompt: &str,
    model_id: &str,
) -> Result<Category> {
    let start = Instant::now();
    let request = ClassificationRequest::new(prompt, model_id).to_invoke_request();

    let result = client.invoke_model(model_id, &request).await.and_then(|response| {
        if let Some(usage) = &response.usage {
            telemetry::record_token_usage("classify", usage);
        }
        let label = response.first_text()?;
        let category = Category::parse(label);
        info!(label, category = %category, "prompt classified");
        Ok(category)
    });

    telemetry::record_request("classify", start, result.is_ok());
    if let Ok(category) = &result {
        telemetry::record_classification(category);
    }
    result
}

/// Lenient gate: `true` for `Category E`, `false` for anything else or on error.
pub async fn valid_prompt(client: &dyn InferenceClient, prompt: &str, model_id: &str) -> bool {
    match classify_with(client, prompt, model_id).await {
        Ok(category) => category.is_allowed(),
        Err(e) => {
            warn!(
                client = client.name(),
                error = %e,
                kind = ?e.kind(),
                "error validating prompt; treating as not allowed"
            );
            false
        }
    }
}
