//! Persisted user settings
//!
//! Settings live as pretty-printed JSON in the platform config directory.
//! A missing file means defaults; unknown or absent fields fall back to
//! their defaults so older files keep loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use design_schema::Viewport;
use inference::{Palette, ProviderConfig};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{defaults, paths, viewports};

fn default_provider() -> String {
    defaults::PROVIDER.to_string()
}

/// Target frame size for generated screens
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "lowercase")]
pub enum ViewportPreset {
    #[default]
    Desktop,
    Tablet,
    Mobile,
    Custom { width: f64, height: f64 },
}

impl ViewportPreset {
    pub fn viewport(self) -> Viewport {
        match self {
            ViewportPreset::Desktop => viewports::DESKTOP,
            ViewportPreset::Tablet => viewports::TABLET,
            ViewportPreset::Mobile => viewports::MOBILE,
            ViewportPreset::Custom { width, height } => {
                Viewport::new(width.max(1.0), height.max(1.0))
            }
        }
    }
}

/// Everything the user configures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Registered provider name
    #[serde(default = "default_provider")]
    pub provider: String,
    /// API key per provider name
    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,
    /// Model override per provider name
    #[serde(default)]
    pub models: BTreeMap<String, String>,
    /// Free-text instructions appended to every prompt
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub viewport: ViewportPreset,
    /// Replaces the default fallback palette when set
    #[serde(default)]
    pub palette: Option<Palette>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_keys: BTreeMap::new(),
            models: BTreeMap::new(),
            instructions: String::new(),
            viewport: ViewportPreset::default(),
            palette: None,
        }
    }
}

impl Settings {
    /// Provider configuration for the selected provider
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: self.api_keys.get(&self.provider).cloned(),
            model: self
                .models
                .get(&self.provider)
                .filter(|model| !model.trim().is_empty())
                .cloned(),
            ..Default::default()
        }
    }

    /// Custom palette if it has any colors
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref().filter(|p| !p.is_empty())
    }
}

/// Loads and saves [`Settings`] in one directory
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform config directory
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join(paths::APP_DIR)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self) -> PathBuf {
        self.dir.join(paths::SETTINGS_FILE)
    }

    /// Load settings from disk
    pub async fn load(&self) -> Result<Settings, SettingsError> {
        let path = self.path();

        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&path).await.map_err(SettingsError::Io)?;

        serde_json::from_str(&contents).map_err(SettingsError::Parse)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.dir).await.map_err(SettingsError::Io)?;

        let path = self.path();
        let contents = serde_json::to_string_pretty(settings).map_err(SettingsError::Serialize)?;

        fs::write(&path, contents).await.map_err(SettingsError::Io)?;

        log::info!("Settings saved to {:?}", path);
        Ok(())
    }
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize settings: {0}")]
    Serialize(serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference::PaletteColor;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested"));
        let settings = store.load().await.unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.provider, "Anthropic");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("draftsmith"));
        let settings = Settings {
            provider: "OpenAI".into(),
            api_keys: BTreeMap::from([("OpenAI".to_string(), "sk-test".to_string())]),
            instructions: "Prefer rounded corners".into(),
            viewport: ViewportPreset::Custom {
                width: 1280.0,
                height: 800.0,
            },
            palette: Some(Palette {
                colors: vec![PaletteColor::new("Brand", "#FF5500")],
            }),
            ..Default::default()
        };
        store.save(&settings).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(paths::SETTINGS_FILE), "{not json").unwrap();
        let store = SettingsStore::new(dir.path());
        assert!(matches!(store.load().await, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"viewport":{"preset":"mobile"}}"#).unwrap();
        assert_eq!(settings.provider, "Anthropic");
        assert_eq!(settings.viewport.viewport(), viewports::MOBILE);
    }

    #[test]
    fn test_provider_config_uses_selected_provider() {
        let settings = Settings {
            provider: "OpenAI".into(),
            api_keys: BTreeMap::from([
                ("Anthropic".to_string(), "a-key".to_string()),
                ("OpenAI".to_string(), "o-key".to_string()),
            ]),
            models: BTreeMap::from([("OpenAI".to_string(), "  ".to_string())]),
            ..Default::default()
        };
        let config = settings.provider_config();
        assert_eq!(config.api_key(), Some("o-key"));
        assert_eq!(config.model, None);
    }

    #[test]
    fn test_empty_palette_is_ignored() {
        let settings = Settings {
            palette: Some(Palette { colors: vec![] }),
            ..Default::default()
        };
        assert!(settings.palette().is_none());
    }
}
