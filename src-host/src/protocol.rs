//! Messages exchanged with the UI
//!
//! One JSON object per line in each direction, discriminated by `type`.

use design_schema::{DesignDocument, Viewport};
use design_tokens::DesignSystemSnapshot;
use inference::ImageInput;
use render_engine::{RenderedArtifact, SelectionSummary};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Requests sent by the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum UiRequest {
    /// Render a ready-made document
    RenderDesign {
        /// Raw document; validated the same way model output is
        document: serde_json::Value,
        /// Settings viewport when absent
        #[serde(default)]
        viewport: Option<Viewport>,
    },
    /// Serialize the selection as a design document
    RequestSelectionData,
    /// Summarise the selection
    GetSelection,
    RefreshDesignSystem,
    SaveSettings { settings: Settings },
    LoadSettings,
    /// Generate a design from a prompt and render it
    Generate {
        prompt: String,
        #[serde(default)]
        image: Option<ImageInput>,
        /// Edit the selected design instead of creating a new one
        #[serde(default)]
        edit: bool,
    },
    /// Stop the running generation
    CancelGeneration,
}

/// Messages sent to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum HostMessage {
    SelectionChanged(SelectionSummary),
    SelectionData {
        document: Option<DesignDocument>,
    },
    DesignSystemLoaded {
        design_system: DesignSystemSnapshot,
    },
    GenerationStarted {
        provider: String,
    },
    /// Cumulative length of the streamed response so far
    GenerationProgress {
        length: usize,
    },
    GenerationComplete {
        success: bool,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        artifact: Option<RenderedArtifact>,
    },
    SettingsLoaded {
        settings: Settings,
    },
    Error {
        message: String,
    },
}

impl HostMessage {
    pub fn error(message: impl Into<String>) -> Self {
        HostMessage::Error {
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        HostMessage::GenerationComplete {
            success: false,
            message: message.into(),
            artifact: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_tags_are_kebab_case() {
        let request: UiRequest =
            serde_json::from_value(json!({ "type": "request-selection-data" })).unwrap();
        assert_eq!(request, UiRequest::RequestSelectionData);

        let request: UiRequest = serde_json::from_value(json!({
            "type": "generate",
            "prompt": "A pricing page",
        }))
        .unwrap();
        assert_eq!(
            request,
            UiRequest::Generate {
                prompt: "A pricing page".into(),
                image: None,
                edit: false,
            }
        );
    }

    #[test]
    fn test_image_fields_are_camel_case() {
        let request: UiRequest = serde_json::from_value(json!({
            "type": "generate",
            "prompt": "Match this",
            "image": { "mediaType": "image/png", "base64Data": "AAAA" },
            "edit": true,
        }))
        .unwrap();
        let UiRequest::Generate { image, edit, .. } = request else {
            panic!("expected generate");
        };
        assert!(edit);
        assert_eq!(image.unwrap().media_type, "image/png");
    }

    #[test]
    fn test_unknown_request_type_is_rejected() {
        let result = serde_json::from_value::<UiRequest>(json!({ "type": "launch-rockets" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_host_message_shapes() {
        let value = serde_json::to_value(HostMessage::SelectionChanged(SelectionSummary {
            count: 1,
            names: vec!["Card".into()],
        }))
        .unwrap();
        assert_eq!(
            value,
            json!({ "type": "selection-changed", "count": 1, "names": ["Card"] })
        );

        let value = serde_json::to_value(HostMessage::failed("boom")).unwrap();
        assert_eq!(
            value,
            json!({ "type": "generation-complete", "success": false, "message": "boom" })
        );

        let value = serde_json::to_value(HostMessage::GenerationProgress { length: 42 }).unwrap();
        assert_eq!(value, json!({ "type": "generation-progress", "length": 42 }));
    }
}
