//! Anthropic Messages API provider
//!
//! The system prompt travels in the dedicated `system` field. The stream is
//! a sequence of typed events; only text deltas, the stop reason and
//! `message_stop` matter here.

use async_trait::async_trait;
use serde_json::Value;

use super::sse::{decode_events, SseFrame};
use super::{check_status, ProviderBackend, ProviderCapabilities, ProviderError, StreamEvent, TextStream};
use crate::config::ProviderConfig;
use crate::constants::anthropic;
use crate::types::{AnthropicContent, AnthropicMessage, ImageSource, MessagesRequest, PromptContext};

/// Provider for the Anthropic Messages API
pub struct AnthropicBackend {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
}

impl AnthropicBackend {
    /// Create a provider from configuration; the API key is required.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| ProviderError::MissingApiKey("Anthropic".to_string()))?
            .to_string();
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(anthropic::BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            http_client: reqwest::Client::new(),
            api_key,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| anthropic::DEFAULT_MODEL.to_string()),
            endpoint: format!("{}{}", base_url, anthropic::MESSAGES_PATH),
            max_tokens: config.max_tokens,
        })
    }

    /// Get static capabilities (for registry info before instantiation)
    pub fn static_capabilities() -> ProviderCapabilities {
        ProviderCapabilities {
            vision: true,
            streaming: true,
            system_field: true,
        }
    }

    /// Map one SSE frame to events
    pub fn parse_frame(frame: &SseFrame) -> Option<Result<Vec<StreamEvent>, ProviderError>> {
        let json: Value = serde_json::from_str(&frame.data).ok()?;
        let kind = json
            .get("type")
            .and_then(Value::as_str)
            .or(frame.event.as_deref())?;

        match kind {
            "content_block_delta" => {
                let delta = json.get("delta")?;
                if delta.get("type").and_then(Value::as_str) != Some("text_delta") {
                    return Some(Ok(Vec::new()));
                }
                let text = delta.get("text").and_then(Value::as_str)?;
                Some(Ok(vec![StreamEvent::Delta(text.to_string())]))
            }
            "message_delta" => {
                let reason = json
                    .get("delta")
                    .and_then(|d| d.get("stop_reason"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Some(Ok(vec![StreamEvent::Finish(reason)]))
            }
            "message_stop" => Some(Ok(vec![StreamEvent::Done])),
            "error" => {
                let message = json
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                Some(Err(ProviderError::Stream(message.to_string())))
            }
            // message_start, content_block_start/stop, ping
            _ => Some(Ok(Vec::new())),
        }
    }
}

#[async_trait]
impl ProviderBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        "Anthropic"
    }

    fn description(&self) -> &'static str {
        "Anthropic Messages API with streaming and image input."
    }

    fn capabilities(&self) -> ProviderCapabilities {
        Self::static_capabilities()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, context: &PromptContext) -> Result<Value, ProviderError> {
        let mut content = Vec::with_capacity(2);
        if let Some(image) = &context.image {
            content.push(AnthropicContent::Image {
                source: ImageSource {
                    kind: "base64".to_string(),
                    media_type: image.media_type.clone(),
                    data: image.base64_data.clone(),
                },
            });
        }
        content.push(AnthropicContent::Text {
            text: context.user_text(),
        });

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            stream: true,
            system: context.system_prompt.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content,
            }],
        };
        Ok(serde_json::to_value(request)?)
    }

    async fn stream_generation(&self, context: &PromptContext) -> Result<TextStream, ProviderError> {
        let body = self.build_request(context)?;
        log::info!(
            "Sending {:?} request to Anthropic ({})",
            context.mode(),
            self.model
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", anthropic::API_VERSION)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(decode_events(response.bytes_stream(), Self::parse_frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageInput;

    fn backend() -> AnthropicBackend {
        AnthropicBackend::new(&ProviderConfig::with_key("sk-test")).unwrap()
    }

    fn frame(data: &str) -> SseFrame {
        SseFrame {
            event: None,
            data: data.to_string(),
        }
    }

    #[test]
    fn test_requires_api_key() {
        let result = AnthropicBackend::new(&ProviderConfig::default());
        assert!(matches!(result, Err(ProviderError::MissingApiKey(_))));
    }

    #[test]
    fn test_request_uses_system_field() {
        let ctx = PromptContext::text("SYSTEM", "a card");
        let body = backend().build_request(&ctx).unwrap();
        assert_eq!(body["system"], "SYSTEM");
        assert_eq!(body["stream"], true);
        assert_eq!(body["max_tokens"], 16384);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["text"], "a card");
    }

    #[test]
    fn test_request_with_image_puts_image_first() {
        let ctx = PromptContext::text("SYSTEM", "like this").with_image(ImageInput {
            media_type: "image/png".into(),
            base64_data: "AAAA".into(),
        });
        let body = backend().build_request(&ctx).unwrap();
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image");
        assert_eq!(content[0]["source"]["media_type"], "image/png");
        assert_eq!(content[1]["type"], "text");
    }

    #[test]
    fn test_custom_base_url() {
        let config = ProviderConfig {
            base_url: Some("http://localhost:9000/".into()),
            ..ProviderConfig::with_key("k")
        };
        let backend = AnthropicBackend::new(&config).unwrap();
        assert_eq!(backend.endpoint, "http://localhost:9000/v1/messages");
    }

    #[test]
    fn test_parse_text_delta() {
        let events = AnthropicBackend::parse_frame(&frame(
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"{\"na"}}"#,
        ))
        .unwrap()
        .unwrap();
        assert_eq!(events, vec![StreamEvent::Delta("{\"na".into())]);
    }

    #[test]
    fn test_parse_stop_reason_and_stop() {
        let events = AnthropicBackend::parse_frame(&frame(
            r#"{"type":"message_delta","delta":{"stop_reason":"max_tokens"}}"#,
        ))
        .unwrap()
        .unwrap();
        assert_eq!(events, vec![StreamEvent::Finish(Some("max_tokens".into()))]);

        let events = AnthropicBackend::parse_frame(&frame(r#"{"type":"message_stop"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[test]
    fn test_parse_error_event() {
        let result = AnthropicBackend::parse_frame(&frame(
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        ))
        .unwrap();
        assert!(matches!(result, Err(ProviderError::Stream(m)) if m == "Overloaded"));
    }

    #[test]
    fn test_malformed_frame_skipped() {
        assert!(AnthropicBackend::parse_frame(&frame("not json")).is_none());
    }

    #[test]
    fn test_unencodable_body_is_a_request_error() {
        // JSON object keys must be strings
        let body: std::collections::BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into();
        let error = ProviderError::from(serde_json::to_value(body).unwrap_err());
        assert!(matches!(error, ProviderError::Request(_)));
        assert!(error.to_string().starts_with("Failed to encode request"));
    }
}
