//! Provider registry for runtime provider discovery and instantiation
//!
//! The registry maps provider names to factories. Providers are registered
//! at compile time via feature flags.

use std::collections::BTreeMap;

use super::{ProviderBackend, ProviderError, ProviderInfo};
use crate::config::ProviderConfig;

#[cfg(feature = "provider-anthropic")]
use super::AnthropicBackend;

#[cfg(feature = "provider-openai")]
use super::OpenAiBackend;

/// Factory trait for creating provider instances
pub trait ProviderFactory: Send + Sync {
    /// Create a provider configured with `config`
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ProviderBackend>, ProviderError>;

    /// Get information about this provider
    fn info(&self) -> ProviderInfo;
}

/// Factory for the Anthropic provider
#[cfg(feature = "provider-anthropic")]
pub struct AnthropicFactory;

#[cfg(feature = "provider-anthropic")]
impl ProviderFactory for AnthropicFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ProviderBackend>, ProviderError> {
        Ok(Box::new(AnthropicBackend::new(config)?))
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "Anthropic".to_string(),
            description: "Anthropic Messages API".to_string(),
            default_model: crate::constants::anthropic::DEFAULT_MODEL.to_string(),
            capabilities: AnthropicBackend::static_capabilities(),
        }
    }
}

/// Factory for the OpenAI-compatible provider
#[cfg(feature = "provider-openai")]
pub struct OpenAiFactory;

#[cfg(feature = "provider-openai")]
impl ProviderFactory for OpenAiFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ProviderBackend>, ProviderError> {
        Ok(Box::new(OpenAiBackend::new(config)?))
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "OpenAI".to_string(),
            description: "OpenAI-compatible chat completions".to_string(),
            default_model: crate::constants::openai::DEFAULT_MODEL.to_string(),
            capabilities: OpenAiBackend::static_capabilities(),
        }
    }
}

/// Registry of available providers
///
/// Lookup by name is case-insensitive so persisted settings written as
/// `"anthropic"` or `"Anthropic"` both resolve.
pub struct ProviderRegistry {
    factories: BTreeMap<String, Box<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create a new registry with all compiled-in providers registered
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self {
            factories: BTreeMap::new(),
        };

        #[cfg(feature = "provider-anthropic")]
        registry.register("Anthropic", Box::new(AnthropicFactory));

        #[cfg(feature = "provider-openai")]
        registry.register("OpenAI", Box::new(OpenAiFactory));

        registry
    }

    /// Register a provider factory
    pub fn register(&mut self, name: &str, factory: Box<dyn ProviderFactory>) {
        self.factories.insert(name.to_string(), factory);
    }

    fn lookup(&self, name: &str) -> Option<&dyn ProviderFactory> {
        self.factories
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|(_, factory)| factory.as_ref())
    }

    /// List all registered provider names
    pub fn available_names(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Get information about all registered providers
    pub fn list(&self) -> Vec<ProviderInfo> {
        self.factories.values().map(|f| f.info()).collect()
    }

    /// Create a provider instance by name
    pub fn create(
        &self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn ProviderBackend>, ProviderError> {
        self.lookup(name)
            .ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))?
            .create(config)
    }

    /// Check if a provider is registered
    pub fn is_available(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider() {
        let registry = ProviderRegistry::new();
        let result = registry.create("Gemini", &ProviderConfig::with_key("k"));
        assert!(matches!(result, Err(ProviderError::UnknownProvider(name)) if name == "Gemini"));
    }

    #[cfg(all(feature = "provider-anthropic", feature = "provider-openai"))]
    #[test]
    fn test_registry_has_default_providers() {
        let registry = ProviderRegistry::new();
        assert_eq!(registry.available_names(), vec!["Anthropic", "OpenAI"]);
        assert!(registry.is_available("anthropic"));
        assert_eq!(registry.list().len(), 2);
    }

    #[cfg(feature = "provider-anthropic")]
    #[test]
    fn test_create_requires_key() {
        let registry = ProviderRegistry::new();
        let result = registry.create("Anthropic", &ProviderConfig::default());
        assert!(matches!(result, Err(ProviderError::MissingApiKey(_))));
        let backend = registry
            .create("Anthropic", &ProviderConfig::with_key("k"))
            .unwrap();
        assert_eq!(backend.name(), "Anthropic");
    }
}
