//! Session state and request handling
//!
//! A session owns the scene, the settings and at most one running
//! generation. Each operation builds its own token index from the scene so a
//! render never sees a stale design system.

use std::sync::Arc;

use design_schema::{parse_design_document, ParseError, Viewport};
use design_tokens::{IndexLimits, TokenIndex, TokenSourceError};
use inference::{
    build_prompt, CancelSignal, GenerationGateway, ImageInput, PromptContext, ProviderError,
    SharedGateway,
};
use parking_lot::{Mutex, RwLock};
use render_engine::{
    render, selection_summary, serialize_selection, MemoryScene, NodeId, RenderError,
    RenderOptions, RenderedArtifact, SceneError, SceneHost, SelectionSummary,
};
use tokio::sync::mpsc;

use crate::constants::limits;
use crate::protocol::{HostMessage, UiRequest};
use crate::settings::{Settings, SettingsError, SettingsStore};

/// Channel carrying messages back to the UI
pub type Outbox = mpsc::UnboundedSender<HostMessage>;

/// Shared session type for the request loop
pub type SharedSession = Arc<Session>;

/// Error types for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Could not read the generated design. Try a simpler request. ({0})")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Design system unavailable: {0}")]
    DesignSystem(#[from] TokenSourceError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Select a design to edit first")]
    EmptySelection,

    #[error("A generation is already running")]
    Busy,

    #[error("Failed to serialize the selection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One generation request from the UI
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: Option<ImageInput>,
    /// Regenerate the selected design instead of creating a new one
    pub edit: bool,
}

/// Clears the active generation slot when dropped
struct ActiveGeneration<'a> {
    slot: &'a Mutex<Option<CancelSignal>>,
    cancel: CancelSignal,
}

impl Drop for ActiveGeneration<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

pub struct Session {
    scene: Mutex<MemoryScene>,
    limits: IndexLimits,
    store: SettingsStore,
    settings: RwLock<Settings>,
    /// Fixed gateway; when absent one is created from settings per generation
    gateway: Option<SharedGateway>,
    active: Mutex<Option<CancelSignal>>,
}

impl Session {
    pub fn new(scene: MemoryScene, store: SettingsStore, settings: Settings) -> Self {
        Self {
            scene: Mutex::new(scene),
            limits: IndexLimits::default(),
            store,
            settings: RwLock::new(settings),
            gateway: None,
            active: Mutex::new(None),
        }
    }

    /// Create a session with settings loaded from `store`
    pub async fn open(scene: MemoryScene, store: SettingsStore) -> Self {
        let settings = match store.load().await {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {}", e);
                Settings::default()
            }
        };
        Self::new(scene, store, settings)
    }

    /// Always generate through `gateway`, ignoring the provider settings
    pub fn with_gateway(mut self, gateway: SharedGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_limits(mut self, limits: IndexLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Run `f` with the scene locked
    pub fn with_scene<R>(&self, f: impl FnOnce(&mut MemoryScene) -> R) -> R {
        f(&mut self.scene.lock())
    }

    // ─── REQUESTS ───────────────────────────────────────────────────

    /// Handle one UI request, answering through `outbox`
    pub async fn handle(&self, request: UiRequest, outbox: &Outbox) {
        match request {
            UiRequest::RenderDesign { document, viewport } => {
                match self.render_document(&document, viewport) {
                    Ok(artifact) => {
                        send(outbox, completed(artifact));
                        send(outbox, HostMessage::SelectionChanged(self.selection()));
                    }
                    Err(e) => {
                        log::error!("Render failed: {}", e);
                        send(outbox, HostMessage::failed(e.to_string()));
                    }
                }
            }
            UiRequest::RequestSelectionData => match self.selection_document() {
                Ok(document) => send(outbox, HostMessage::SelectionData { document }),
                Err(e) => send(outbox, HostMessage::error(e.to_string())),
            },
            UiRequest::GetSelection => {
                send(outbox, HostMessage::SelectionChanged(self.selection()));
            }
            UiRequest::RefreshDesignSystem => match self.build_index() {
                Ok(index) => send(
                    outbox,
                    HostMessage::DesignSystemLoaded {
                        design_system: index.snapshot().clone(),
                    },
                ),
                Err(e) => send(outbox, HostMessage::error(e.to_string())),
            },
            UiRequest::SaveSettings { settings } => match self.save_settings(settings).await {
                Ok(settings) => send(outbox, HostMessage::SettingsLoaded { settings }),
                Err(e) => send(outbox, HostMessage::error(e.to_string())),
            },
            UiRequest::LoadSettings => match self.reload_settings().await {
                Ok(settings) => send(outbox, HostMessage::SettingsLoaded { settings }),
                Err(e) => send(outbox, HostMessage::error(e.to_string())),
            },
            UiRequest::Generate {
                prompt,
                image,
                edit,
            } => {
                let request = GenerateRequest {
                    prompt,
                    image,
                    edit,
                };
                match self.generate(request, outbox).await {
                    Ok(artifact) => {
                        send(outbox, completed(artifact));
                        send(outbox, HostMessage::SelectionChanged(self.selection()));
                    }
                    Err(e) => {
                        log::error!("Generation failed: {}", e);
                        send(outbox, HostMessage::failed(e.to_string()));
                    }
                }
            }
            UiRequest::CancelGeneration => {
                if !self.cancel() {
                    log::debug!("Cancel requested with no generation running");
                }
            }
        }
    }

    // ─── OPERATIONS ─────────────────────────────────────────────────

    /// Fresh index over the scene's design system
    pub fn build_index(&self) -> Result<TokenIndex, SessionError> {
        let scene = self.scene.lock();
        Ok(TokenIndex::build(&*scene, &self.limits)?)
    }

    pub fn selection(&self) -> SelectionSummary {
        selection_summary(&*self.scene.lock())
    }

    /// The selection as a design document, `None` when nothing is selected
    pub fn selection_document(
        &self,
    ) -> Result<Option<design_schema::DesignDocument>, SessionError> {
        let index = self.build_index()?;
        let scene = self.scene.lock();
        Ok(serialize_selection(&*scene, &index)?)
    }

    /// Validate and render a document supplied by the UI
    pub fn render_document(
        &self,
        document: &serde_json::Value,
        viewport: Option<Viewport>,
    ) -> Result<RenderedArtifact, SessionError> {
        let document = parse_design_document(&document.to_string())?;
        let viewport = viewport.unwrap_or_else(|| self.settings.read().viewport.viewport());
        let index = self.build_index()?;

        let mut scene = self.scene.lock();
        Ok(render(
            &document,
            viewport,
            &index,
            &mut *scene,
            &RenderOptions::default(),
        )?)
    }

    pub async fn save_settings(&self, settings: Settings) -> Result<Settings, SessionError> {
        self.store.save(&settings).await?;
        *self.settings.write() = settings.clone();
        Ok(settings)
    }

    pub async fn reload_settings(&self) -> Result<Settings, SessionError> {
        let settings = self.store.load().await?;
        *self.settings.write() = settings.clone();
        Ok(settings)
    }

    /// Signal the running generation to stop; returns whether one was running
    pub fn cancel(&self) -> bool {
        match self.active.lock().as_ref() {
            Some(cancel) => {
                log::info!("Cancelling generation");
                cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.active.lock().is_some()
    }

    fn begin(&self) -> Result<ActiveGeneration<'_>, SessionError> {
        let mut slot = self.active.lock();
        if slot.is_some() {
            return Err(SessionError::Busy);
        }
        let cancel = CancelSignal::new();
        *slot = Some(cancel.clone());
        Ok(ActiveGeneration {
            slot: &self.active,
            cancel,
        })
    }

    fn gateway(&self, settings: &Settings) -> Result<SharedGateway, SessionError> {
        match &self.gateway {
            Some(gateway) => Ok(Arc::clone(gateway)),
            None => Ok(Arc::new(GenerationGateway::with_provider(
                &settings.provider,
                &settings.provider_config(),
            )?)),
        }
    }

    // ─── GENERATION ─────────────────────────────────────────────────

    /// Prompt, stream, parse and render one design.
    ///
    /// The scene is only touched once the whole response has been parsed, so
    /// a cancelled or failed generation leaves it unchanged.
    pub async fn generate(
        &self,
        request: GenerateRequest,
        outbox: &Outbox,
    ) -> Result<RenderedArtifact, SessionError> {
        let active = self.begin()?;
        let settings = self.settings();
        let index = self.build_index()?;

        let mut viewport = settings.viewport.viewport();
        let mut prior_document = None;
        let mut replace: Option<NodeId> = None;
        if request.edit {
            let scene = self.scene.lock();
            let document =
                serialize_selection(&*scene, &index)?.ok_or(SessionError::EmptySelection)?;
            if let [single] = scene.selection().as_slice() {
                replace = Some(single.clone());
                viewport = Viewport::new(
                    document.width.unwrap_or(viewport.width),
                    document.height.unwrap_or(viewport.height),
                );
            }
            prior_document = Some(document.to_json()?);
        }

        let system_prompt = build_prompt(
            viewport,
            Some(index.snapshot()),
            &settings.instructions,
            settings.palette(),
        );
        let mut context = PromptContext::text(system_prompt, request.prompt);
        if let Some(image) = request.image {
            context = context.with_image(image);
        }
        if let Some(document) = prior_document {
            context = context.with_prior_document(document);
        }

        let gateway = self.gateway(&settings)?;
        send(
            outbox,
            HostMessage::GenerationStarted {
                provider: gateway.current_provider_name().await,
            },
        );

        let mut reported = 0usize;
        let generation = gateway
            .generate(&context, &active.cancel, |text| {
                if text.len() >= reported + limits::PROGRESS_STEP_CHARS {
                    reported = text.len();
                    send(outbox, HostMessage::GenerationProgress { length: reported });
                }
            })
            .await?;
        send(
            outbox,
            HostMessage::GenerationProgress {
                length: generation.text.len(),
            },
        );

        let document = parse_design_document(&generation.text)?;
        if active.cancel.is_cancelled() {
            return Err(ProviderError::Cancelled.into());
        }
        log::info!(
            "Parsed '{}' with {} elements",
            document.name,
            document.element_count()
        );

        let options = match replace {
            Some(node) => RenderOptions::replacing(node),
            None => RenderOptions::default(),
        };
        let mut scene = self.scene.lock();
        Ok(render(&document, viewport, &index, &mut *scene, &options)?)
    }
}

fn send(outbox: &Outbox, message: HostMessage) {
    if outbox.send(message).is_err() {
        log::debug!("UI channel closed; dropping message");
    }
}

fn completed(artifact: RenderedArtifact) -> HostMessage {
    let mut message = format!("Rendered {} elements", artifact.element_count);
    if artifact.failed_nodes > 0 {
        message.push_str(&format!(", {} skipped", artifact.failed_nodes));
    }
    if !artifact.warnings.is_empty() {
        message.push_str(&format!(
            ", {} references used fallbacks",
            artifact.warnings.len()
        ));
    }
    HostMessage::GenerationComplete {
        success: true,
        message,
        artifact: Some(artifact),
    }
}
