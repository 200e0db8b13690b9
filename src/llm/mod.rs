pub mod xai;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "https://api.x.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "grok-2-latest";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends one query and returns the extracted response text. Never retries.
    async fn send(&self, query: &str) -> Result<String, ApiError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }
}
