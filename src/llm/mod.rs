use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::LlmConfig;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are John — a professional customer support AI.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(
        &self,
        message: &str,
        history: &[Value],
        system_prompt: Option<&str>,
    ) -> Result<String>;
}

/// Client for the Groq OpenAI-compatible chat completions API.
/// Stateless between calls; holds only fixed configuration.
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(cfg: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.clone(),
        }
    }
}

/// System prompt first, history verbatim (entries are trusted to carry
/// role/content pairs), user message last.
fn build_messages(message: &str, history: &[Value], system_prompt: Option<&str>) -> Vec<Value> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(json!({
        "role": "system",
        "content": system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT),
    }));
    messages.extend_from_slice(history);
    messages.push(json!({ "role": "user", "content": message }));
    messages
}

#[async_trait]
impl ChatProvider for GroqClient {
    async fn complete(
        &self,
        message: &str,
        history: &[Value],
        system_prompt: Option<&str>,
    ) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": build_messages(message, history, system_prompt),
            "temperature": 0.2,
            "max_tokens": 800,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("Completion request failed: {e}"))?;

        let status = response.status();
        let data: Value = response
            .json()
            .await
            .map_err(|_| anyhow!("Completion API returned non-JSON response ({status})"))?;

        if !status.is_success() {
            let detail = data
                .get("error")
                .map(|e| e.to_string())
                .unwrap_or_else(|| data.to_string());
            return Err(anyhow!("Completion API error: {detail}"));
        }

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or_else(|| anyhow!("Unexpected completion response shape"))
    }
}
