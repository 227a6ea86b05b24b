//! Configuration types for the inference library

use serde::{Deserialize, Serialize};

use crate::constants::defaults;

fn default_max_tokens() -> u32 {
    defaults::MAX_TOKENS
}

/// Configuration for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// API credential
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier; provider default when absent
    #[serde(default)]
    pub model: Option<String>,
    /// Endpoint override (proxies, compatible servers)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: None,
            max_tokens: default_max_tokens(),
        }
    }
}

impl ProviderConfig {
    /// Default configuration with an API key
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Non-empty API key, if configured
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
