//! Sampling parameters for InvokeModel requests.

use serde::{Deserialize, Serialize};

use crate::{GateError, Result};

/// Token budget, temperature and nucleus threshold for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature (0.0 to 1.0).
    pub temperature: f32,

    /// Nucleus sampling threshold (0.0 to 1.0).
    pub top_p: f32,
}

impl SamplingParams {
    /// Fixed parameters for the topic classifier: ten tokens, greedy.
    pub const CLASSIFIER: SamplingParams = SamplingParams {
        max_tokens: 10,
        temperature: 0.0,
        top_p: 0.1,
    };

    /// Token budget for answer generation.
    pub const GENERATION_MAX_TOKENS: u32 = 500;

    /// Generation parameters with the given temperature and top_p.
    pub fn generation(temperature: f32, top_p: f32) -> Self {
        Self {
            max_tokens: Self::GENERATION_MAX_TOKENS,
            temperature,
            top_p,
        }
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set top_p.
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Reject values the service would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(GateError::InvalidInput(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(GateError::InvalidInput(format!(
                "temperature must be within [0, 1], got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(GateError::InvalidInput(format!(
                "top_p must be within [0, 1], got {}",
                self.top_p
            )));
        }
        Ok(())
    }
}

impl Default for SamplingParams {
    /// Orchestration defaults: low temperature, broad nucleus.
    fn default() -> Self {
        Self::generation(0.1, 0.9)
    }
}
