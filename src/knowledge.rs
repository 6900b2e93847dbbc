//! Knowledge base lookup.
//!
//! Sends the raw query to the managed vector index and hands back the
//! passages in service order. The result count is fixed at
//! [`DEFAULT_RESULT_COUNT`].

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::Result;
use crate::telemetry;
use crate::traits::RetrievalClient;
use crate::types::{DEFAULT_RESULT_COUNT, RetrievalPassage, RetrieveRequest};

/// Retrieves supporting passages from one knowledge base.
#[derive(Clone)]
pub struct KnowledgeQuery {
    client: Arc<dyn RetrievalClient>,
    kb_id: String,
}

impl KnowledgeQuery {
    pub fn new(client: Arc<dyn RetrievalClient>, kb_id: impl Into<String>) -> Self {
        Self {
            client,
            kb_id: kb_id.into(),
        }
    }

    /// Knowledge base queried.
    pub fn kb_id(&self) -> &str {
        &self.kb_id
    }

    /// Retrieve up to three passages for `query`.
    #[instrument(skip(self, query), fields(operation = "retrieve", kb_id = %self.kb_id))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievalPassage>> {
        retrieve_with(self.client.as_ref(), query, &self.kb_id).await
    }

    /// Like [`retrieve`](Self::retrieve), but logs errors and returns no passages.
    pub async fn retrieve_or_empty(&self, query: &str) -> Vec<RetrievalPassage> {
        query_knowledge_base(self.client.as_ref(), query, &self.kb_id).await
    }
}

/// Retrieve passages for `query` from `kb_id` through `client`.
pub async fn retrieve_with(
    client: &dyn RetrievalClient,
    query: &str,
    kb_id: &str,
) -> Result<Vec<RetrievalPassage>> {
    let start = Instant::now();
    let request = RetrieveRequest::new(query, DEFAULT_RESULT_COUNT);

    let result = client
        .retrieve(kb_id, &request)
        .await
        .map(|response| response.retrieval_results);

    telemetry::record_request("retrieve", start, result.is_ok());
    if let Ok(passages) = &result {
        info!(count = passages.len(), "knowledge base returned passages");
    }
    result
}

/// Lenient lookup: the service's passages, or an empty list on error.
pub async fn query_knowledge_base(
    client: &dyn RetrievalClient,
    query: &str,
    kb_id: &str,
) -> Vec<RetrievalPassage> {
    match retrieve_with(client, query, kb_id).await {
        Ok(passages) => passages,
        Err(e) => {
            warn!(
                client = client.name(),
                kb_id,
                error = %e,
                kind = ?e.kind(),
                "error querying knowledge base; returning no passages"
            );
            Vec::new()
        }
    }
}
