//! Classify → retrieve → generate orchestration.
//!
//! ```text
//! prompt ──► PromptClassifier ──► Category E? ──no──► Rejected
//!                                     │
//!                                    yes
//!                                     ▼
//!                              KnowledgeQuery (3 passages)
//!                                     │
//!                                     ▼
//!                             ResponseGenerator ──► Answered
//! ```
//!
//! Steps run strictly in sequence. Retrieved passages are returned to the
//! caller alongside the answer; the answer itself is generated from the
//! raw prompt.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::classifier::PromptClassifier;
use crate::config::Config;
use crate::generator::ResponseGenerator;
use crate::knowledge::KnowledgeQuery;
use crate::providers::{
    BedrockRuntimeClient, KnowledgeBaseClient, RetryConfig, RetryingInferenceClient,
    RetryingRetrievalClient,
};
use crate::traits::{InferenceClient, RetrievalClient};
use crate::types::{Category, RetrievalPassage, SamplingParams};
use crate::{GateError, Result};

/// What the pipeline did with a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The prompt was not classified as heavy machinery.
    Rejected { category: Category },
    /// Classification itself failed; the prompt was rejected without a label.
    Unclassified { reason: String },
    /// The prompt passed the gate and was answered.
    Answered {
        category: Category,
        passages: Vec<RetrievalPassage>,
        response: String,
    },
}

impl PipelineOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, PipelineOutcome::Answered { .. })
    }

    /// Category the gate decided on, if classification succeeded.
    pub fn category(&self) -> Option<&Category> {
        match self {
            PipelineOutcome::Rejected { category } | PipelineOutcome::Answered { category, .. } => {
                Some(category)
            }
            PipelineOutcome::Unclassified { .. } => None,
        }
    }
}

/// The assembled gate: classifier, knowledge query and generator.
#[derive(Clone)]
pub struct Pipeline {
    classifier: PromptClassifier,
    knowledge: KnowledgeQuery,
    generator: ResponseGenerator,
    temperature: f32,
    top_p: f32,
}

impl Pipeline {
    /// Create a new builder for configuring the pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Assemble a pipeline from already-built components.
    pub fn new(
        classifier: PromptClassifier,
        knowledge: KnowledgeQuery,
        generator: ResponseGenerator,
    ) -> Self {
        let defaults = SamplingParams::default();
        Self {
            classifier,
            knowledge,
            generator,
            temperature: defaults.temperature,
            top_p: defaults.top_p,
        }
    }

    /// Override the generation temperature and top_p.
    ///
    /// Both must lie within `[0, 1]`; out-of-range values fail with
    /// `InvalidInput` here, so [`run`](Self::run) never sends a request
    /// it cannot finish.
    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Result<Self> {
        SamplingParams::generation(temperature, top_p).validate()?;
        self.temperature = temperature;
        self.top_p = top_p;
        Ok(self)
    }

    pub fn classifier(&self) -> &PromptClassifier {
        &self.classifier
    }

    pub fn knowledge(&self) -> &KnowledgeQuery {
        &self.knowledge
    }

    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Run the full sequence, surfacing the first error.
    #[instrument(skip(self, prompt))]
    pub async fn run(&self, prompt: &str) -> Result<PipelineOutcome> {
        let category = self.classifier.classify(prompt).await?;
        if !category.is_allowed() {
            info!(category = %category, "prompt rejected");
            return Ok(PipelineOutcome::Rejected { category });
        }

        let passages = self.knowledge.retrieve(prompt).await?;
        log_passages(&passages);

        let response = self
            .generator
            .generate(prompt, self.temperature, self.top_p)
            .await?;

        Ok(PipelineOutcome::Answered {
            category,
            passages,
            response,
        })
    }

    /// Run the full sequence without failing.
    ///
    /// A classification error rejects the prompt as
    /// [`PipelineOutcome::Unclassified`]. A retrieval error yields no
    /// passages and a generation error yields an empty response.
    #[instrument(skip(self, prompt))]
    pub async fn run_lenient(&self, prompt: &str) -> PipelineOutcome {
        let category = match self.classifier.classify(prompt).await {
            Ok(category) => category,
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "classification failed; rejecting prompt");
                return PipelineOutcome::Unclassified {
                    reason: e.to_string(),
                };
            }
        };
        if !category.is_allowed() {
            info!(category = %category, "prompt rejected");
            return PipelineOutcome::Rejected { category };
        }

        let passages = self.knowledge.retrieve_or_empty(prompt).await;
        log_passages(&passages);
        let response = self
            .generator
            .generate_or_empty(prompt, self.temperature, self.top_p)
            .await;

        PipelineOutcome::Answered {
            category,
            passages,
            response,
        }
    }
}

fn log_passages(passages: &[RetrievalPassage]) {
    for (rank, passage) in passages.iter().enumerate() {
        info!(rank, score = ?passage.score, text = passage.text(), "retrieved passage");
    }
}

/// Builder for [`Pipeline`].
///
/// Clients are taken as trait objects so tests can inject doubles;
/// [`from_config`](Self::from_config) wires up the Bedrock HTTP clients.
pub struct PipelineBuilder {
    inference: Option<Arc<dyn InferenceClient>>,
    retrieval: Option<Arc<dyn RetrievalClient>>,
    model_id: Option<String>,
    kb_id: Option<String>,
    sampling: SamplingParams,
    retry: RetryConfig,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            inference: None,
            retrieval: None,
            model_id: None,
            kb_id: None,
            sampling: SamplingParams::default(),
            retry: RetryConfig::disabled(),
        }
    }

    /// Builder with Bedrock clients and settings taken from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.aws.timeout();
        let api_key = config.api_key();

        let inference = BedrockRuntimeClient::with_timeout(
            config.runtime_endpoint(),
            api_key.clone(),
            timeout,
        )?;
        let retrieval =
            KnowledgeBaseClient::with_timeout(config.agent_endpoint(), api_key, timeout)?;

        let mut builder = Self::new()
            .inference_client(Arc::new(inference))
            .retrieval_client(Arc::new(retrieval))
            .model_id(config.models.model_id.clone())
            .temperature(config.generation.temperature)
            .top_p(config.generation.top_p)
            .retry(config.retry.to_retry_config());
        if let Some(kb_id) = &config.knowledge_base.kb_id {
            builder = builder.kb_id(kb_id.clone());
        }
        Ok(builder)
    }

    /// Client used for classification and generation.
    pub fn inference_client(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    /// Client used for knowledge base retrieval.
    pub fn retrieval_client(mut self, client: Arc<dyn RetrievalClient>) -> Self {
        self.retrieval = Some(client);
        self
    }

    /// Model used for both classification and generation.
    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Knowledge base to query.
    pub fn kb_id(mut self, kb_id: impl Into<String>) -> Self {
        self.kb_id = Some(kb_id.into());
        self
    }

    /// Generation temperature (default 0.1).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.sampling.temperature = temperature;
        self
    }

    /// Generation top_p (default 0.9).
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.sampling.top_p = top_p;
        self
    }

    /// Retry policy for both clients (default: no retries).
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let inference = self.inference.ok_or_else(|| {
            GateError::Configuration("no inference client configured".to_string())
        })?;
        let retrieval = self.retrieval.ok_or_else(|| {
            GateError::Configuration("no retrieval client configured".to_string())
        })?;
        let model_id = self
            .model_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| GateError::Configuration("no model id configured".to_string()))?;
        let kb_id = self
            .kb_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                GateError::Configuration("no knowledge base id configured".to_string())
            })?;
        self.sampling
            .validate()
            .map_err(|e| GateError::Configuration(e.to_string()))?;

        let (inference, retrieval): (Arc<dyn InferenceClient>, Arc<dyn RetrievalClient>) =
            if self.retry.is_enabled() {
                (
                    Arc::new(RetryingInferenceClient::new(inference, self.retry.clone())),
                    Arc::new(RetryingRetrievalClient::new(retrieval, self.retry)),
                )
            } else {
                (inference, retrieval)
            };

        Pipeline::new(
            PromptClassifier::new(inference.clone(), model_id.clone()),
            KnowledgeQuery::new(retrieval, kb_id),
            ResponseGenerator::new(inference, model_id),
        )
        .with_sampling(self.sampling.temperature, self.sampling.top_p)
    }
}
