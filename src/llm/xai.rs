use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::Client as HttpClient;
use reqwest::header::{ HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE };
use serde::Serialize;
use serde_json::Value;

use super::{ ChatClient, LlmConfig };
use crate::error::ApiError;

#[derive(Debug)]
pub struct XAIChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
    system_prompt: String,
    temperature: f32,
}

#[derive(Serialize)]
struct XAIRequest<'a> {
    model: &'a str,
    messages: Vec<XAIMessage<'a>>,
    stream: bool,
    temperature: f32,
}

#[derive(Serialize)]
struct XAIMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl XAIChatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http: http_client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ChatClient for XAIChatClient {
    async fn send(&self, query: &str) -> Result<String, ApiError> {
        let req = XAIRequest {
            model: &self.model,
            messages: vec![
                XAIMessage { role: "system", content: &self.system_prompt },
                XAIMessage { role: "user", content: query }
            ],
            stream: false,
            temperature: self.temperature,
        };

        debug!("Making API request to {} for input length: {}", self.base_url, query.len());
        let resp = self.http
            .post(&self.base_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&req)
            .send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!("API response status code: {}", status.as_u16());
            return Err(ApiError::from_status(status.as_u16(), body));
        }
        debug!("API response status code: {}", status.as_u16());

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ApiError::Parse(format!("body is not JSON: {}", e)))?;
        let content = extract_text(&value).ok_or_else(||
            ApiError::Parse("no text field or choices[0].message.content in response".to_string())
        )?;

        debug!("Successfully received response of length: {}", content.len());
        Ok(content)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}

/// Accepts a bare `{"text": ..}` body as well as the chat-completions shape.
pub fn extract_text(value: &Value) -> Option<String> {
    if let Some(text) = value.get("text").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    let choice = value.get("choices")?.as_array()?.first()?;
    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .or_else(|| choice.get("text").and_then(Value::as_str))
        .map(str::to_string)
}
