//! Provider constants
//!
//! Single source of truth for endpoints, default models and request budgets.

/// Anthropic Messages API
pub mod anthropic {
    pub const BASE_URL: &str = "https://api.anthropic.com";
    pub const MESSAGES_PATH: &str = "/v1/messages";
    pub const API_VERSION: &str = "2023-06-01";
    pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
}

/// OpenAI-compatible chat completions API
pub mod openai {
    pub const BASE_URL: &str = "https://api.openai.com";
    pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
    pub const DEFAULT_MODEL: &str = "gpt-4o";
    /// Terminal SSE payload
    pub const DONE_SENTINEL: &str = "[DONE]";
}

/// Request defaults
pub mod defaults {
    /// Generous ceiling so typical documents are not truncated
    pub const MAX_TOKENS: u32 = 16_384;
}

/// Stop reasons that mean the model ran out of budget
pub const TRUNCATION_STOP_REASONS: &[&str] = &["max_tokens", "length"];
