//! Pluggable generative-model provider abstraction
//!
//! Every provider turns a [`PromptContext`] into a stream of [`StreamEvent`]s.
//! Providers differ only in the request envelope and in how their
//! server-sent-event frames are shaped; the gateway handles accumulation,
//! progress and cancellation uniformly.

pub mod registry;
pub mod sse;

#[cfg(feature = "provider-anthropic")]
pub mod anthropic;

#[cfg(feature = "provider-openai")]
pub mod openai;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

use crate::types::PromptContext;

#[cfg(feature = "provider-anthropic")]
pub use anthropic::AnthropicBackend;

#[cfg(feature = "provider-openai")]
pub use openai::OpenAiBackend;

pub use registry::{ProviderFactory, ProviderRegistry};

/// Error types for provider operations
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Provider stream error: {0}")]
    Stream(String),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("No API key configured for {0}")]
    MissingApiKey(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to encode request: {0}")]
    Request(#[from] serde_json::Error),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

/// One decoded unit of a provider stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental text in arrival order
    Delta(String),
    /// The provider reported why it stopped (e.g. `end_turn`, `max_tokens`)
    Finish(Option<String>),
    /// Explicit end-of-stream
    Done,
}

/// Stream of decoded events from a provider
pub type TextStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, ProviderError>> + Send>>;

/// Capabilities that a provider may or may not support
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderCapabilities {
    /// Accepts an image in the user turn
    pub vision: bool,
    /// Streams incremental output
    pub streaming: bool,
    /// Takes the system prompt as a dedicated request field rather than a message
    pub system_field: bool,
}

/// Provider information for UI display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider identifier (e.g., "Anthropic", "OpenAI")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Model used when the configuration names none
    pub default_model: String,
    pub capabilities: ProviderCapabilities,
}

/// The core trait that all providers implement.
///
/// Application code talks to the [`GenerationGateway`](crate::GenerationGateway),
/// which drives whichever provider is configured.
#[async_trait]
pub trait ProviderBackend: Send + Sync {
    // ─── IDENTITY ───────────────────────────────────────────────────

    /// Human-readable name for UI display
    fn name(&self) -> &'static str;

    /// Description of this provider
    fn description(&self) -> &'static str;

    /// What this provider supports
    fn capabilities(&self) -> ProviderCapabilities;

    /// Model identifier requests are sent with
    fn model(&self) -> &str;

    // ─── GENERATION ─────────────────────────────────────────────────

    /// Provider-specific request body for a context
    fn build_request(&self, context: &PromptContext) -> Result<serde_json::Value, ProviderError>;

    /// Send the request and return the decoded event stream.
    ///
    /// Fails with [`ProviderError::Http`] on a non-success status, carrying
    /// the response body.
    async fn stream_generation(&self, context: &PromptContext) -> Result<TextStream, ProviderError>;
}

/// Turn a non-success response into `ProviderError::Http`
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    log::error!("Provider request failed with {}: {}", status, body);
    Err(ProviderError::Http {
        status: status.as_u16(),
        body,
    })
}
