//! Design generation inference library
//!
//! This library turns a user request into streamed model output:
//! - **Prompt builder**: system instructions encoding the document schema and
//!   either the host design system (token mode) or a fallback palette
//! - **Providers**: Anthropic-style and OpenAI-style streaming adapters behind
//!   one trait
//! - **Gateway**: single entry point that accumulates the stream, reports
//!   cumulative progress and honours cooperative cancellation
//!
//! # Example
//!
//! ```rust,ignore
//! use inference::{build_prompt, CancelSignal, GenerationGateway, PromptContext, ProviderConfig};
//!
//! let system = build_prompt(viewport, Some(index.snapshot()), "", None);
//! let gateway = GenerationGateway::with_provider("Anthropic", &ProviderConfig::with_key(key))?;
//! let context = PromptContext::text(system, "A login screen for a banking app");
//! let generation = gateway
//!     .generate(&context, &CancelSignal::new(), |text| println!("{} chars", text.len()))
//!     .await?;
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod prompt;
pub mod types;

// Re-exports for convenience
pub use backend::{
    ProviderBackend, ProviderCapabilities, ProviderError, ProviderFactory, ProviderInfo,
    ProviderRegistry, StreamEvent, TextStream,
};

#[cfg(feature = "provider-anthropic")]
pub use backend::AnthropicBackend;

#[cfg(feature = "provider-openai")]
pub use backend::OpenAiBackend;

pub use config::ProviderConfig;
pub use gateway::{CancelSignal, Generation, GenerationGateway, SharedGateway};
pub use prompt::{build_prompt, Palette, PaletteColor};
pub use types::{ImageInput, PromptContext, RequestMode};
