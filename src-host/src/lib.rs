//! Draftsmith host
//!
//! Wires the pipeline together behind the UI message contract:
//! - **Session**: scene, settings and the generate → parse → render flow
//! - **Protocol**: `UiRequest` / `HostMessage` JSON messages
//! - **Settings**: provider, keys, instructions, viewport and palette on disk
//! - **Bridge**: JSON-lines over stdin/stdout

pub mod bridge;
pub mod constants;
pub mod protocol;
pub mod session;
pub mod settings;

pub use bridge::{load_scene, serve, SeedError};
pub use protocol::{HostMessage, UiRequest};
pub use session::{GenerateRequest, Outbox, Session, SessionError, SharedSession};
pub use settings::{Settings, SettingsError, SettingsStore, ViewportPreset};
