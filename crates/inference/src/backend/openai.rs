//! OpenAI-compatible chat completions provider
//!
//! The system prompt is sent as the first, system-role message. Works with
//! any server implementing the streaming `/v1/chat/completions` endpoint.

use async_trait::async_trait;
use serde_json::Value;

use super::sse::{decode_events, SseFrame};
use super::{check_status, ProviderBackend, ProviderCapabilities, ProviderError, StreamEvent, TextStream};
use crate::config::ProviderConfig;
use crate::constants::openai;
use crate::types::{ChatMessage, ChatRequest, ContentPart, ImageUrlData, PromptContext};

/// Provider for OpenAI-style chat completions
pub struct OpenAiBackend {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
}

impl OpenAiBackend {
    /// Create a provider from configuration; the API key is required.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| ProviderError::MissingApiKey("OpenAI".to_string()))?
            .to_string();
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(openai::BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            http_client: reqwest::Client::new(),
            api_key,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
            endpoint: format!("{}{}", base_url, openai::COMPLETIONS_PATH),
            max_tokens: config.max_tokens,
        })
    }

    /// Get static capabilities (for registry info before instantiation)
    pub fn static_capabilities() -> ProviderCapabilities {
        ProviderCapabilities {
            vision: true,
            streaming: true,
            system_field: false,
        }
    }

    /// Map one SSE frame to events
    pub fn parse_frame(frame: &SseFrame) -> Option<Result<Vec<StreamEvent>, ProviderError>> {
        let data = frame.data.trim();
        if data == openai::DONE_SENTINEL {
            return Some(Ok(vec![StreamEvent::Done]));
        }

        let json: Value = serde_json::from_str(data).ok()?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Some(Err(ProviderError::Stream(message.to_string())));
        }

        let choice = json.get("choices").and_then(|c| c.get(0))?;
        let mut events = Vec::new();
        if let Some(content) = choice
            .get("delta")
            .and_then(|d| d.get("content"))
            .and_then(Value::as_str)
        {
            if !content.is_empty() {
                events.push(StreamEvent::Delta(content.to_string()));
            }
        }
        if let Some(reason) = choice.get("finish_reason").and_then(Value::as_str) {
            events.push(StreamEvent::Finish(Some(reason.to_string())));
        }
        Some(Ok(events))
    }
}

#[async_trait]
impl ProviderBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn description(&self) -> &'static str {
        "OpenAI-compatible chat completions with streaming and image input."
    }

    fn capabilities(&self) -> ProviderCapabilities {
        Self::static_capabilities()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, context: &PromptContext) -> Result<Value, ProviderError> {
        let mut user_content = vec![ContentPart::Text {
            text: context.user_text(),
        }];
        if let Some(image) = &context.image {
            user_content.push(ContentPart::ImageUrl {
                image_url: ImageUrlData {
                    url: image.data_url(),
                },
            });
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: vec![ContentPart::Text {
                        text: context.system_prompt.clone(),
                    }],
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content,
                },
            ],
            stream: true,
            max_tokens: Some(self.max_tokens),
        };
        Ok(serde_json::to_value(request)?)
    }

    async fn stream_generation(&self, context: &PromptContext) -> Result<TextStream, ProviderError> {
        let body = self.build_request(context)?;
        log::info!("Sending {:?} request to OpenAI ({})", context.mode(), self.model);

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
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

    fn frame(data: &str) -> SseFrame {
        SseFrame {
            event: None,
            data: data.to_string(),
        }
    }

    #[test]
    fn test_backend_name() {
        let backend = OpenAiBackend::new(&ProviderConfig::with_key("sk-test")).unwrap();
        assert_eq!(backend.name(), "OpenAI");
        assert_eq!(backend.model(), openai::DEFAULT_MODEL);
    }

    #[test]
    fn test_request_inlines_system_message() {
        let backend = OpenAiBackend::new(&ProviderConfig::with_key("sk-test")).unwrap();
        let ctx = PromptContext::text("SYSTEM", "a card").with_image(ImageInput {
            media_type: "image/png".into(),
            base64_data: "AAAA".into(),
        });
        let body = backend.build_request(&ctx).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"][0]["text"], "SYSTEM");
        assert_eq!(body["messages"][1]["content"][1]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert_eq!(body["stream"], true);
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_parse_done_sentinel() {
        let events = OpenAiBackend::parse_frame(&frame("[DONE]")).unwrap().unwrap();
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[test]
    fn test_parse_delta_with_finish_reason() {
        let events = OpenAiBackend::parse_frame(&frame(
            r#"{"id":"x","choices":[{"delta":{"content":"}"},"finish_reason":"length"}]}"#,
        ))
        .unwrap()
        .unwrap();
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("}".into()),
                StreamEvent::Finish(Some("length".into()))
            ]
        );
    }

    #[test]
    fn test_parse_error_field() {
        let result = OpenAiBackend::parse_frame(&frame(r#"{"error":{"message":"Rate limited"}}"#)).unwrap();
        assert!(matches!(result, Err(ProviderError::Stream(m)) if m == "Rate limited"));
    }

    #[test]
    fn test_keepalive_skipped() {
        assert!(OpenAiBackend::parse_frame(&frame("keep-alive")).is_none());
    }
}
