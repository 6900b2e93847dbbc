//! InvokeModel request and response bodies (Anthropic messages format).

use serde::{Deserialize, Serialize};

use super::message::Message;
use super::options::SamplingParams;
use crate::{GateError, Result};

/// Protocol version tag expected by Anthropic models on Bedrock.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Body of an InvokeModel call.
///
/// Field names and order follow the service schema exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub anthropic_version: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl InvokeRequest {
    /// Build a request from messages and sampling parameters.
    pub fn new(messages: Vec<Message>, params: SamplingParams) -> Self {
        Self {
            anthropic_version: ANTHROPIC_VERSION.to_string(),
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
        }
    }

    /// Single user-role message request.
    pub fn user_text(text: impl Into<String>, params: SamplingParams) -> Self {
        Self::new(vec![Message::user(text)], params)
    }

    /// Sampling parameters carried by this request.
    pub fn params(&self) -> SamplingParams {
        SamplingParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

/// A content block in a model response.
///
/// Kept loose: non-text blocks (tool use, thinking) carry no `text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBlock {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Token usage reported by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Body of an InvokeModel response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub content: Vec<ResponseBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl InvokeResponse {
    /// Response holding a single text block.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ResponseBlock {
                kind: Some("text".to_string()),
                text: Some(text.into()),
            }],
            ..Self::default()
        }
    }

    /// Text of the first content block.
    ///
    /// No blocks at all is [`GateError::EmptyResponse`]; a first block
    /// without text is [`GateError::MalformedResponse`].
    pub fn first_text(&self) -> Result<&str> {
        let block = self.content.first().ok_or(GateError::EmptyResponse)?;
        block.text.as_deref().ok_or_else(|| {
            GateError::MalformedResponse(format!(
                "first content block has no text (type: {})",
                block.kind.as_deref().unwrap_or("unknown")
            ))
        })
    }
}
