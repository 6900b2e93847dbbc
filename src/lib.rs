//! bedrock-gate - topic gate, knowledge-base retrieval and answer generation
//! over Amazon Bedrock.
//!
//! A prompt is first classified against a fixed five-category rubric. Only
//! prompts about heavy machinery (`Category E`) go on to knowledge base
//! retrieval and answer generation; everything else is rejected.
//!
//! The remote services sit behind two traits, [`InferenceClient`] and
//! [`RetrievalClient`], so every component can run against test doubles.
//!
//! # Example
//!
//! ```rust,no_run
//! use bedrock_gate::{Config, PipelineBuilder, PipelineOutcome};
//!
//! #[tokio::main]
//! async fn main() -> bedrock_gate::Result<()> {
//!     let config = Config::load(None)?;
//!     let pipeline = PipelineBuilder::from_config(&config)?
//!         .kb_id("GJAQ7CUOSJ")
//!         .build()?;
//!
//!     match pipeline.run("How does a hydraulic excavator work?").await? {
//!         PipelineOutcome::Answered { response, .. } => println!("{response}"),
//!         other => println!("rejected: {:?}", other.category()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Strict and lenient calls
//!
//! Every step has a strict form returning [`Result`] and a lenient form
//! that logs errors and falls back to `false`, an empty passage list or an
//! empty string:
//!
//! | step | strict | lenient |
//! |---|---|---|
//! | classify | [`PromptClassifier::classify`] | [`PromptClassifier::is_allowed`], [`valid_prompt`] |
//! | retrieve | [`KnowledgeQuery::retrieve`] | [`KnowledgeQuery::retrieve_or_empty`], [`query_knowledge_base`] |
//! | generate | [`ResponseGenerator::generate`] | [`ResponseGenerator::generate_or_empty`], [`generate_response`] |

pub mod classifier;
pub mod config;
pub mod error;
pub mod generator;
pub mod knowledge;
pub mod pipeline;
pub mod providers;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use classifier::{ClassificationRequest, PromptClassifier, rubric_prompt, valid_prompt};
pub use config::Config;
pub use error::{ErrorKind, GateError, Result};
pub use generator::{GenerationRequest, ResponseGenerator, generate_response};
pub use knowledge::{KnowledgeQuery, query_knowledge_base};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineOutcome};
pub use providers::{BedrockRuntimeClient, KnowledgeBaseClient, RetryConfig};
pub use traits::{InferenceClient, RetrievalClient};
pub use version::PKG_VERSION;

// Re-export all types
pub use types::{
    Category, ContentBlock, InvokeRequest, InvokeResponse, Message, RetrievalPassage,
    RetrieveRequest, RetrieveResponse, Role, SamplingParams, Usage,
};
