use crate::core::LowLevelClient;
use crate::error::AIError;
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "deepseek")]
use super::deepseek::DeepSeekClient;
#[cfg(feature = "gemini")]
use super::gemini::{GeminiClient, GeminiConfig};
use super::mock::{MockClient, MockHandle, MockResponse};

/// Which model provider backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    #[cfg(feature = "gemini")]
    Gemini,
    #[cfg(feature = "deepseek")]
    DeepSeek,
    Mock,
}

impl From<ClientType> for Box<dyn LowLevelClient> {
    fn from(client_type: ClientType) -> Self {
        match client_type {
            #[cfg(feature = "gemini")]
            ClientType::Gemini => Box::new(GeminiClient::default()),
            #[cfg(feature = "deepseek")]
            ClientType::DeepSeek => Box::new(DeepSeekClient::default()),
            // Nothing queued and no handle kept: every call fails, so the
            // service answers with fallback content.
            ClientType::Mock => Box::new(MockClient::new().0),
        }
    }
}

impl Default for ClientType {
    /// Pick the first provider whose API key is available, else the mock.
    fn default() -> Self {
        #[cfg(feature = "gemini")]
        {
            use crate::config::KeyFromEnv;
            if GeminiClient::has_key() {
                return Self::Gemini;
            }
        }
        #[cfg(feature = "deepseek")]
        {
            use crate::config::KeyFromEnv;
            if DeepSeekClient::has_key() {
                return Self::DeepSeek;
            }
        }
        Self::Mock
    }
}

impl FromStr for ClientType {
    type Err = String;

    /// Parse client type from string (case insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            #[cfg(feature = "gemini")]
            "gemini" => Ok(Self::Gemini),
            #[cfg(feature = "deepseek")]
            "deepseek" => Ok(Self::DeepSeek),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown client type: '{}'. Supported: gemini, deepseek, mock", s)),
        }
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "gemini")]
            ClientType::Gemini => write!(f, "gemini"),
            #[cfg(feature = "deepseek")]
            ClientType::DeepSeek => write!(f, "deepseek"),
            ClientType::Mock => write!(f, "mock"),
        }
    }
}

/// Flexible client that wraps any LowLevelClient and provides factory functions
#[derive(Debug, Clone)]
pub struct FlexibleClient {
    inner: Arc<dyn LowLevelClient>,
}

impl FlexibleClient {
    /// Create a new FlexibleClient for the given provider using its default configuration
    pub fn from_type(client_type: ClientType) -> Self {
        let boxed: Box<dyn LowLevelClient> = client_type.into();
        Self { inner: Arc::from(boxed) }
    }

    /// Create a new FlexibleClient wrapping the given client
    pub fn new(client: Box<dyn LowLevelClient>) -> Self {
        Self { inner: Arc::from(client) }
    }

    /// Create a FlexibleClient with a Gemini client
    #[cfg(feature = "gemini")]
    pub fn gemini(config: GeminiConfig) -> Self {
        Self::new(Box::new(GeminiClient::new(config)))
    }

    /// Create a FlexibleClient with a mock and return the handle for configuration
    pub fn mock() -> (Self, Arc<MockHandle>) {
        Self::mock_with_responses(Vec::new())
    }

    /// Create a FlexibleClient mock with predefined responses
    pub fn mock_with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (mock_client, handle) = MockClient::with_responses(responses);
        (Self::new(Box::new(mock_client)), handle)
    }
}

#[async_trait]
impl LowLevelClient for FlexibleClient {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.inner.ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
