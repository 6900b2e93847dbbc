//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.bedrock-gate/config.toml` (user)
//! 3. `/etc/bedrock-gate/config.toml` (system)
//!
//! With no file at all the built-in defaults apply. Environment variables
//! override file values:
//!
//! | variable | field |
//! |---|---|
//! | `AWS_REGION` | `aws.region` |
//! | `BEDROCK_MODEL_ID` | `models.model_id` |
//! | `BEDROCK_KB_ID` | `knowledge_base.kb_id` |
//!
//! The Bedrock API key is never read from the config file; it comes from
//! `AWS_BEARER_TOKEN_BEDROCK`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::providers::{RetryConfig, agent_runtime_endpoint, runtime_endpoint};
use crate::{GateError, Result};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Model used when none is configured.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";

/// Environment variable holding the Bedrock API key.
pub const API_KEY_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Region, endpoints and transport settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AwsConfig {
    /// AWS region (default: us-west-2).
    #[serde(default = "default_region")]
    pub region: String,
    /// Override for the Bedrock Runtime endpoint.
    #[serde(default)]
    pub runtime_endpoint: Option<String>,
    /// Override for the Bedrock Agent Runtime endpoint.
    #[serde(default)]
    pub agent_endpoint: Option<String>,
    /// Request timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            runtime_endpoint: None,
            agent_endpoint: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl AwsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelsConfig {
    /// Model used for classification and generation.
    #[serde(default = "default_model_id")]
    pub model_id: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
        }
    }
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Knowledge base to query. No default; must be configured.
    #[serde(default)]
    pub kb_id: Option<String>,
}

/// Sampling used for answer generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

fn default_temperature() -> f32 {
    0.1
}

fn default_top_p() -> f32 {
    0.9
}

/// Retry policy as written in the config file.
///
/// Defaults to a single attempt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.max_attempts.max(1))
            .initial_delay(Duration::from_millis(self.initial_delay_ms))
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .jitter(self.jitter)
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_jitter() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard locations, then apply
    /// environment overrides.
    ///
    /// An explicit path must exist. Without one, a missing user/system
    /// file is not an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GateError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            GateError::Configuration(msg) => {
                GateError::Configuration(format!("Failed to parse config file {path:?}: {msg}"))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GateError::Configuration(e.to_string()))
    }

    /// Apply overrides, looking each variable up through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(region) = var("AWS_REGION") {
            self.aws.region = region;
        }
        if let Some(model_id) = var("BEDROCK_MODEL_ID") {
            self.models.model_id = model_id;
        }
        if let Some(kb_id) = var("BEDROCK_KB_ID") {
            self.knowledge_base.kb_id = Some(kb_id);
        }
        self
    }

    /// Bedrock Runtime endpoint: explicit override or the regional default.
    pub fn runtime_endpoint(&self) -> String {
        self.aws
            .runtime_endpoint
            .clone()
            .unwrap_or_else(|| runtime_endpoint(&self.aws.region))
    }

    /// Bedrock Agent Runtime endpoint: explicit override or the regional default.
    pub fn agent_endpoint(&self) -> String {
        self.aws
            .agent_endpoint
            .clone()
            .unwrap_or_else(|| agent_runtime_endpoint(&self.aws.region))
    }

    /// Bedrock API key from the environment.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(GateError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".bedrock-gate").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/bedrock-gate/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
