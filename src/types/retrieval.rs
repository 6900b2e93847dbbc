//! Knowledge base Retrieve request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of passages requested from the knowledge base.
pub const DEFAULT_RESULT_COUNT: u32 = 3;

/// Body of a Retrieve call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    pub retrieval_query: RetrievalQuery,
    pub retrieval_configuration: RetrievalConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl RetrieveRequest {
    /// Vector search for `query` returning at most `number_of_results` passages.
    pub fn new(query: impl Into<String>, number_of_results: u32) -> Self {
        Self {
            retrieval_query: RetrievalQuery { text: query.into() },
            retrieval_configuration: RetrievalConfiguration {
                vector_search_configuration: VectorSearchConfiguration { number_of_results },
            },
            next_token: None,
        }
    }

    /// Query text.
    pub fn query(&self) -> &str {
        &self.retrieval_query.text
    }

    /// Requested result count.
    pub fn number_of_results(&self) -> u32 {
        self.retrieval_configuration
            .vector_search_configuration
            .number_of_results
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfiguration {
    pub vector_search_configuration: VectorSearchConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchConfiguration {
    pub number_of_results: u32,
}

/// Body of a Retrieve response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResponse {
    pub retrieval_results: Vec<RetrievalPassage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// One retrieved passage, passed through as the service returned it.
///
/// Only `content.text` and `score` are given names; every other field
/// (location, metadata, anything added later) is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalPassage {
    #[serde(default)]
    pub content: PassageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RetrievalPassage {
    /// Passage with only text content, for test doubles.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: PassageContent {
                text: text.into(),
                ..PassageContent::default()
            },
            ..Self::default()
        }
    }

    /// Passage text.
    pub fn text(&self) -> &str {
        &self.content.text
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassageContent {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
