use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::config::KeyFromEnv;
use crate::core::LowLevelClient;
use crate::error::{AIError, DeepSeekError};

/// Steers chat models toward bare JSON replies; prompts still describe the shape.
const SYSTEM_PROMPT: &str = "You write study material for Indian competitive exam aspirants. \
Answer with the requested JSON only, without commentary.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Configuration for DeepSeek client
#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: DeepSeekClient::find_key().unwrap_or_default(),
            model: "deepseek-chat".to_string(),
            base_url: "https://api.deepseek.com/v1".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            timeout: Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    config: DeepSeekConfig,
    http: Client,
}

impl KeyFromEnv for DeepSeekClient {
    const KEY_NAME: &'static str = "DEEPSEEK_API_KEY";
}

impl Default for DeepSeekClient {
    fn default() -> Self {
        Self::new(DeepSeekConfig::default())
    }
}

impl DeepSeekClient {
    pub fn new(config: DeepSeekConfig) -> Self {
        if config.api_key.is_empty() {
            warn!("DeepSeek client created without an API key; every request will fail");
        }
        let http = Client::builder().timeout(config.timeout).build().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default HTTP client");
            Client::new()
        });
        info!(model = %config.model, "Creating new DeepSeek client");
        Self { config, http }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

fn status_error(status: StatusCode, body: String) -> DeepSeekError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => DeepSeekError::RateLimit,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DeepSeekError::Authentication,
        StatusCode::PAYMENT_REQUIRED => DeepSeekError::Api(format!("insufficient balance: {body}")),
        _ => DeepSeekError::Api(format!("{status}: {body}")),
    }
}

#[async_trait]
impl LowLevelClient for DeepSeekClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model))]
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                DeepSeekError::Http(e.to_string())
            })?;

        let status = response.status();
        debug!(status = %status, "Received response from DeepSeek API");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = status_error(status, body);
            warn!(error = %err, "DeepSeek request rejected");
            return Err(err.into());
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse DeepSeek response JSON");
            DeepSeekError::Http(e.to_string())
        })?;

        let text = parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| DeepSeekError::Api("response contained no message content".to_string()))?;

        info!(response_len = text.len(), "DeepSeek response received");
        Ok(text)
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }

    fn provider_name(&self) -> &'static str {
        "deepseek"
    }
}
