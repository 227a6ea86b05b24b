//! Generation Gateway - Single entry point for all generation requests
//!
//! The gateway owns the active provider, accumulates its stream into the raw
//! response text, reports cumulative progress after every fragment and
//! stops as soon as the cancellation signal fires, even mid-fragment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::{Notify, RwLock};

use crate::backend::{
    ProviderBackend, ProviderError, ProviderInfo, ProviderRegistry, StreamEvent, TextStream,
};
use crate::config::ProviderConfig;
use crate::constants::TRUNCATION_STOP_REASONS;
use crate::types::PromptContext;

/// Cancellation signal shared between the caller and a generation
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<CancelState>);

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::SeqCst);
        self.0.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        loop {
            // Registered before the flag check so a concurrent cancel is not missed
            let notified = self.0.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Result of a completed generation
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Accumulated raw text, fragments in arrival order
    pub text: String,
    /// Provider stop reason, when reported
    pub stop_reason: Option<String>,
    /// Name of the provider that produced the text
    pub provider: String,
}

impl Generation {
    /// Whether the provider stopped because it ran out of tokens
    pub fn is_truncated(&self) -> bool {
        self.stop_reason
            .as_deref()
            .is_some_and(|reason| TRUNCATION_STOP_REASONS.contains(&reason))
    }
}

/// The single entry point for generation.
///
/// Application code only talks to the gateway, never to providers directly.
pub struct GenerationGateway {
    /// The currently active provider
    backend: Arc<RwLock<Box<dyn ProviderBackend>>>,
    /// Registry of available providers
    registry: ProviderRegistry,
}

impl GenerationGateway {
    /// Create a gateway around an existing provider instance
    pub fn with_backend(backend: Box<dyn ProviderBackend>) -> Self {
        Self {
            backend: Arc::new(RwLock::new(backend)),
            registry: ProviderRegistry::new(),
        }
    }

    /// Create a gateway for a registered provider
    pub fn with_provider(name: &str, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let registry = ProviderRegistry::new();
        let backend = registry.create(name, config)?;
        Ok(Self {
            backend: Arc::new(RwLock::new(backend)),
            registry,
        })
    }

    /// Get the registry for provider information
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// List all available providers with their info
    pub fn available_providers(&self) -> Vec<ProviderInfo> {
        self.registry.list()
    }

    /// Get the name of the currently active provider
    pub async fn current_provider_name(&self) -> String {
        self.backend.read().await.name().to_string()
    }

    /// Switch to a different provider.
    ///
    /// The new provider is created first, so an invalid name or missing key
    /// leaves the current provider in place.
    pub async fn switch_provider(
        &self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<(), ProviderError> {
        let new_backend = self.registry.create(name, config)?;
        let mut guard = self.backend.write().await;
        *guard = new_backend;
        log::info!("Switched to provider: {}", name);
        Ok(())
    }

    // ─── GENERATION ─────────────────────────────────────────────────

    /// Run one generation to completion.
    ///
    /// `on_progress` receives the cumulative text after every fragment.
    pub async fn generate<F>(
        &self,
        context: &PromptContext,
        cancel: &CancelSignal,
        on_progress: F,
    ) -> Result<Generation, ProviderError>
    where
        F: FnMut(&str),
    {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let guard = self.backend.read().await;
        let provider = guard.name().to_string();
        log::info!("Starting generation with {} ({})", provider, guard.model());

        let stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("Generation cancelled before the stream opened");
                return Err(ProviderError::Cancelled);
            }
            stream = guard.stream_generation(context) => stream?,
        };
        let (text, stop_reason) = collect_stream(stream, cancel, on_progress).await?;

        let generation = Generation {
            text,
            stop_reason,
            provider,
        };
        if generation.is_truncated() {
            log::warn!(
                "Generation stopped at the token limit after {} chars; output will need repair",
                generation.text.len()
            );
        } else {
            log::info!("Generation complete: {} chars", generation.text.len());
        }
        Ok(generation)
    }
}

/// Accumulate a provider stream into text and stop reason.
pub(crate) async fn collect_stream<F>(
    mut stream: TextStream,
    cancel: &CancelSignal,
    mut on_progress: F,
) -> Result<(String, Option<String>), ProviderError>
where
    F: FnMut(&str),
{
    let mut text = String::new();
    let mut stop_reason = None;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            event = stream.next() => Some(event),
        };
        let Some(next) = next else {
            log::info!("Generation cancelled after {} chars", text.len());
            return Err(ProviderError::Cancelled);
        };
        let Some(event) = next else {
            break;
        };
        match event? {
            StreamEvent::Delta(fragment) => {
                if fragment.is_empty() {
                    continue;
                }
                text.push_str(&fragment);
                on_progress(&text);
            }
            StreamEvent::Finish(reason) => {
                if reason.is_some() {
                    stop_reason = reason;
                }
            }
            StreamEvent::Done => break,
        }
    }

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok((text, stop_reason))
}

/// Shared gateway type for application state
pub type SharedGateway = Arc<GenerationGateway>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ProviderCapabilities;
    use async_trait::async_trait;
    use futures_util::stream;
    use std::time::Duration;

    fn events(items: Vec<Result<StreamEvent, ProviderError>>) -> TextStream {
        Box::pin(stream::iter(items))
    }

    fn delta(text: &str) -> Result<StreamEvent, ProviderError> {
        Ok(StreamEvent::Delta(text.to_string()))
    }

    /// Provider replaying a fixed script of fragments
    struct ScriptedBackend {
        fragments: Vec<&'static str>,
        stop_reason: &'static str,
    }

    #[async_trait]
    impl ProviderBackend for ScriptedBackend {
        fn name(&self) -> &'static str {
            "Scripted"
        }

        fn description(&self) -> &'static str {
            "Test provider"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities::default()
        }

        fn model(&self) -> &str {
            "script-1"
        }

        fn build_request(&self, context: &PromptContext) -> Result<serde_json::Value, ProviderError> {
            Ok(serde_json::json!({ "prompt": context.user_text() }))
        }

        async fn stream_generation(
            &self,
            _context: &PromptContext,
        ) -> Result<TextStream, ProviderError> {
            let mut items: Vec<_> = self.fragments.iter().map(|f| delta(f)).collect();
            items.push(Ok(StreamEvent::Finish(Some(self.stop_reason.to_string()))));
            items.push(Ok(StreamEvent::Done));
            Ok(events(items))
        }
    }

    #[tokio::test]
    async fn test_progress_is_cumulative() {
        let mut seen = Vec::new();
        let (text, _) = collect_stream(
            events(vec![delta("{\"na"), delta("me\":"), delta("\"X\"}")]),
            &CancelSignal::new(),
            |t| seen.push(t.to_string()),
        )
        .await
        .unwrap();
        assert_eq!(text, "{\"name\":\"X\"}");
        assert_eq!(seen, vec!["{\"na", "{\"name\":", "{\"name\":\"X\"}"]);
    }

    #[tokio::test]
    async fn test_stops_at_done() {
        let (text, reason) = collect_stream(
            events(vec![
                delta("a"),
                Ok(StreamEvent::Finish(Some("end_turn".into()))),
                Ok(StreamEvent::Done),
                delta("ignored"),
            ]),
            &CancelSignal::new(),
            |_| {},
        )
        .await
        .unwrap();
        assert_eq!(text, "a");
        assert_eq!(reason.as_deref(), Some("end_turn"));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let result = collect_stream(events(vec![Ok(StreamEvent::Done)]), &CancelSignal::new(), |_| {}).await;
        assert!(matches!(result, Err(ProviderError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_stream_error_aborts() {
        let result = collect_stream(
            events(vec![delta("a"), Err(ProviderError::Stream("overloaded".into()))]),
            &CancelSignal::new(),
            |_| {},
        )
        .await;
        assert!(matches!(result, Err(ProviderError::Stream(_))));
    }

    #[tokio::test]
    async fn test_cancel_between_fragments() {
        let cancel = CancelSignal::new();
        let trigger = cancel.clone();
        let mut calls = 0;
        let result = collect_stream(
            events(vec![delta("a"), delta("b"), delta("c")]),
            &cancel,
            |_| {
                calls += 1;
                trigger.cancel();
            },
        )
        .await;
        assert!(matches!(result, Err(ProviderError::Cancelled)));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_stalled_stream() {
        let cancel = CancelSignal::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let stalled: TextStream = Box::pin(
            stream::iter(vec![delta("{\"name\":")]).chain(stream::pending()),
        );
        let mut seen = 0;
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            collect_stream(stalled, &cancel, |_| seen += 1),
        )
        .await
        .expect("cancellation should not wait for the next fragment");

        assert!(matches!(result, Err(ProviderError::Cancelled)));
        assert_eq!(seen, 1);
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let cancel = CancelSignal::new();
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), cancel.cancelled())
            .await
            .unwrap();
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_gateway_generate_with_scripted_backend() {
        let _ = env_logger::builder().is_test(true).try_init();
        let gateway = GenerationGateway::with_backend(Box::new(ScriptedBackend {
            fragments: vec!["{\"name\":", "\"Card\"}"],
            stop_reason: "max_tokens",
        }));
        let generation = gateway
            .generate(&PromptContext::text("sys", "card"), &CancelSignal::new(), |_| {})
            .await
            .unwrap();
        assert_eq!(generation.text, "{\"name\":\"Card\"}");
        assert_eq!(generation.provider, "Scripted");
        assert!(generation.is_truncated());
        assert_eq!(gateway.current_provider_name().await, "Scripted");
    }

    #[tokio::test]
    async fn test_pre_cancelled_generation() {
        let gateway = GenerationGateway::with_backend(Box::new(ScriptedBackend {
            fragments: vec!["x"],
            stop_reason: "end_turn",
        }));
        let cancel = CancelSignal::new();
        cancel.cancel();
        let result = gateway
            .generate(&PromptContext::text("sys", "card"), &cancel, |_| {})
            .await;
        assert!(matches!(result, Err(ProviderError::Cancelled)));
    }

    #[tokio::test]
    async fn test_failed_switch_keeps_current_provider() {
        let gateway = GenerationGateway::with_backend(Box::new(ScriptedBackend {
            fragments: vec!["x"],
            stop_reason: "end_turn",
        }));
        let result = gateway
            .switch_provider("Nope", &ProviderConfig::with_key("k"))
            .await;
        assert!(result.is_err());
        assert_eq!(gateway.current_provider_name().await, "Scripted");
    }
}
