//! Common types for inference operations

use serde::{Deserialize, Serialize};

/// Reference image attached to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    /// MIME type, e.g. `image/png`
    pub media_type: String,
    /// Base64 payload without a data-URL prefix
    pub base64_data: String,
}

impl ImageInput {
    /// `data:` URL form used by OpenAI-style providers
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64_data)
    }
}

/// Shape of the user turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
    /// Plain text request
    Text,
    /// Text plus the serialized existing design
    Edit,
    /// Text plus an image (and possibly an existing design)
    Multimodal,
}

/// Everything a provider needs for one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptContext {
    /// Output of the prompt builder
    pub system_prompt: String,
    /// The user's natural-language request
    pub request: String,
    #[serde(default)]
    pub image: Option<ImageInput>,
    /// Serialized design document being edited
    #[serde(default)]
    pub prior_document: Option<String>,
}

impl PromptContext {
    /// Text-only context
    pub fn text(system_prompt: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            request: request.into(),
            image: None,
            prior_document: None,
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_prior_document(mut self, document_json: impl Into<String>) -> Self {
        self.prior_document = Some(document_json.into());
        self
    }

    pub fn mode(&self) -> RequestMode {
        match (&self.image, &self.prior_document) {
            (Some(_), _) => RequestMode::Multimodal,
            (None, Some(_)) => RequestMode::Edit,
            (None, None) => RequestMode::Text,
        }
    }

    /// Text of the user turn, with the existing design appended in edit mode
    pub fn user_text(&self) -> String {
        match &self.prior_document {
            Some(document) => format!(
                "{}\n\nHere is the existing design to modify. Return the complete updated \
                 document in the same JSON format:\n{}",
                self.request.trim(),
                document
            ),
            None => self.request.trim().to_string(),
        }
    }
}

// ─── OPENAI-STYLE ENVELOPE ──────────────────────────────────────────

/// Chat message with multimodal content support
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

/// Content part - text or image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrlData },
}

/// Image URL data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrlData {
    pub url: String,
}

/// Chat completion request (OpenAI-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

// ─── ANTHROPIC-STYLE ENVELOPE ───────────────────────────────────────

/// Messages API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub stream: bool,
    pub system: String,
    pub messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: Vec<AnthropicContent>,
}

/// Content block - text or base64 image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContent {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub media_type: String,
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        let ctx = PromptContext::text("sys", "a login screen");
        assert_eq!(ctx.mode(), RequestMode::Text);

        let ctx = ctx.with_prior_document("{}");
        assert_eq!(ctx.mode(), RequestMode::Edit);

        let ctx = ctx.with_image(ImageInput {
            media_type: "image/png".into(),
            base64_data: "AAAA".into(),
        });
        assert_eq!(ctx.mode(), RequestMode::Multimodal);
    }

    #[test]
    fn test_user_text_includes_prior_document() {
        let ctx = PromptContext::text("sys", "make it blue ")
            .with_prior_document(r#"{"name":"Card","children":[]}"#);
        let text = ctx.user_text();
        assert!(text.starts_with("make it blue\n\n"));
        assert!(text.ends_with(r#"{"name":"Card","children":[]}"#));
    }

    #[test]
    fn test_content_part_wire_format() {
        let part = ContentPart::ImageUrl {
            image_url: ImageUrlData {
                url: "data:image/png;base64,AAAA".into(),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image_url");
        assert_eq!(json["image_url"]["url"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_anthropic_image_block() {
        let block = AnthropicContent::Image {
            source: ImageSource {
                kind: "base64".into(),
                media_type: "image/jpeg".into(),
                data: "AAAA".into(),
            },
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["source"]["type"], "base64");
    }
}
