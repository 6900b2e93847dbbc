//! Test doubles for the inference and retrieval clients.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use bedrock_gate::{
    GateError, InferenceClient, InvokeRequest, InvokeResponse, Result, RetrievalClient,
    RetrievalPassage, RetrieveRequest, RetrieveResponse,
};

type InvokeFn = dyn Fn(&str, &InvokeRequest) -> Result<InvokeResponse> + Send + Sync;
type RetrieveFn = dyn Fn(&str, &RetrieveRequest) -> Result<RetrieveResponse> + Send + Sync;

/// Inference client that answers through a closure and records every call.
pub struct MockInference {
    reply: Box<InvokeFn>,
    calls: Mutex<Vec<(String, InvokeRequest)>>,
}

impl MockInference {
    pub fn new(
        reply: impl Fn(&str, &InvokeRequest) -> Result<InvokeResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with a single text block.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Ok(InvokeResponse::from_text(text.clone())))
    }

    /// Always fails with a fresh error from `make_err`.
    pub fn failing(make_err: fn() -> GateError) -> Self {
        Self::new(move |_, _| Err(make_err()))
    }

    pub fn calls(&self) -> Vec<(String, InvokeRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceClient for MockInference {
    fn name(&self) -> &str {
        "mock-inference"
    }

    async fn invoke_model(
        &self,
        model_id: &str,
        request: &InvokeRequest,
    ) -> Result<InvokeResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((model_id.to_string(), request.clone()));
        (self.reply)(model_id, request)
    }
}

/// Retrieval client that answers through a closure and records every call.
pub struct MockRetrieval {
    reply: Box<RetrieveFn>,
    calls: Mutex<Vec<(String, RetrieveRequest)>>,
}

impl MockRetrieval {
    pub fn new(
        reply: impl Fn(&str, &RetrieveRequest) -> Result<RetrieveResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always returns passages with the given texts.
    pub fn with_passages(texts: &[&str]) -> Self {
        let passages: Vec<RetrievalPassage> =
            texts.iter().map(|t| RetrievalPassage::from_text(*t)).collect();
        Self::new(move |_, _| {
            Ok(RetrieveResponse {
                retrieval_results: passages.clone(),
                next_token: None,
            })
        })
    }

    pub fn failing(make_err: fn() -> GateError) -> Self {
        Self::new(move |_, _| Err(make_err()))
    }

    pub fn calls(&self) -> Vec<(String, RetrieveRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RetrievalClient for MockRetrieval {
    fn name(&self) -> &str {
        "mock-retrieval"
    }

    async fn retrieve(&self, kb_id: &str, request: &RetrieveRequest) -> Result<RetrieveResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((kb_id.to_string(), request.clone()));
        (self.reply)(kb_id, request)
    }
}

/// A classifier request carries the rubric; a generation request does not.
pub fn is_classification(request: &InvokeRequest) -> bool {
    request.messages[0]
        .first_text()
        .is_some_and(|t| t.contains("<user_request>"))
}
