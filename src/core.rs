//! Core generation API: wraps a low-level model client with prompt assembly,
//! JSON extraction from free text, and typed deserialization.
//!
//! - `ContentGenerator::generate_list<T>()` for prompts answered with a JSON array
//! - `ContentGenerator::generate_object<T>()` for prompts answered with a JSON object
//!
//! Callers own the fallback policy: every failure comes back as a
//! `GenerationError` and the content modules substitute their static datasets.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::error::{AIError, GenerationError};
use crate::interceptors::Interceptor;
use crate::json_utils::{extract_first_array, extract_first_object};

/// Low-level model client abstraction.
///
/// Implementors provide `ask_raw`, which executes a prompt and returns the raw
/// model text. Extraction and typing is performed by `ContentGenerator`.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;

    /// Short provider name used in logs and the health endpoint
    fn provider_name(&self) -> &'static str;
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }

    fn provider_name(&self) -> &'static str {
        self.as_ref().provider_name()
    }
}

/// Generator that wraps a `LowLevelClient` and turns prompts into typed values.
#[derive(Clone, Debug)]
pub struct ContentGenerator<C: LowLevelClient> {
    client: C,
    interceptor: Option<Arc<dyn Interceptor>>,
    schema_guidance: bool,
}

impl<C: LowLevelClient> ContentGenerator<C> {
    pub fn new(client: C) -> Self {
        info!(provider = client.provider_name(), "Creating new ContentGenerator");
        Self { client, interceptor: None, schema_guidance: false }
    }

    /// Record every prompt/response exchange through `interceptor`.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Append a JSON schema of the expected type to every prompt.
    pub fn with_schema_guidance(mut self, enabled: bool) -> Self {
        self.schema_guidance = enabled;
        self
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Ask the model and return its raw text, passing the exchange to the interceptor.
    #[instrument(target = "daily_prep::generator", skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn ask(&self, prompt: String) -> Result<String, AIError> {
        let response = self.client.ask_raw(prompt.clone()).await?;
        debug!(response_len = response.len(), "model responded");

        if let Some(interceptor) = &self.interceptor {
            if let Err(e) = interceptor.save(&prompt, &response).await {
                warn!(error = %e, "failed to record model transcript");
            }
        }
        Ok(response)
    }

    /// Prompt for a JSON array and deserialize its elements as `T`.
    #[instrument(target = "daily_prep::generator", skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate_list<T>(&self, prompt: String) -> Result<Vec<T>, GenerationError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let prompt = self.prepare_prompt::<Vec<T>>(prompt);
        let raw = self.ask(prompt).await?;
        let json = extract_first_array(&raw).ok_or(GenerationError::NoJsonFound("array"))?;
        let items: Vec<T> = serde_json::from_str(json)
            .map_err(|e| GenerationError::JsonDeserialization(e, truncate(&raw)))?;
        info!(count = items.len(), "parsed generated list");
        Ok(items)
    }

    /// Prompt for a JSON object and deserialize it as `T`.
    #[instrument(target = "daily_prep::generator", skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate_object<T>(&self, prompt: String) -> Result<T, GenerationError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let prompt = self.prepare_prompt::<T>(prompt);
        let raw = self.ask(prompt).await?;
        let json = extract_first_object(&raw).ok_or(GenerationError::NoJsonFound("object"))?;
        serde_json::from_str(json).map_err(|e| GenerationError::JsonDeserialization(e, truncate(&raw)))
    }

    fn prepare_prompt<T: JsonSchema>(&self, prompt: String) -> String {
        if !self.schema_guidance {
            return prompt;
        }
        let schema = schema_for!(T);
        let schema_json = serde_json::to_string_pretty(&schema)
            .unwrap_or_else(|_| "Schema serialization failed".to_string());
        format!(
            "{}\n\n## Response Format\nReply with valid JSON matching this schema:\n```json\n{}\n```",
            prompt, schema_json
        )
    }
}

fn truncate(raw: &str) -> String {
    const LIMIT: usize = 500;
    if raw.len() <= LIMIT {
        return raw.to_string();
    }
    let mut cut = LIMIT;
    while !raw.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &raw[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{MockClient, MockResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema, PartialEq)]
    struct Pair {
        a: i32,
    }

    #[tokio::test]
    async fn list_is_extracted_from_prose() {
        let (client, _handle) = MockClient::with_responses(vec![MockResponse::Success(
            "Sure! Here you go:\n```json\n[{\"a\": 1}, {\"a\": 2}]\n```\nGood luck.".to_string(),
        )]);
        let generator = ContentGenerator::new(client);
        let items: Vec<Pair> = generator.generate_list("p".to_string()).await.unwrap();
        assert_eq!(items, vec![Pair { a: 1 }, Pair { a: 2 }]);
    }

    #[tokio::test]
    async fn object_missing_is_reported() {
        let (client, _handle) =
            MockClient::with_responses(vec![MockResponse::Success("no json at all".to_string())]);
        let generator = ContentGenerator::new(client);
        let err = generator.generate_object::<Pair>("p".to_string()).await.unwrap_err();
        assert!(matches!(err, GenerationError::NoJsonFound("object")));
    }

    #[tokio::test]
    async fn schema_guidance_is_appended() {
        let (client, handle) =
            MockClient::with_responses(vec![MockResponse::Success("{\"a\": 3}".to_string())]);
        let generator = ContentGenerator::new(client).with_schema_guidance(true);
        let pair: Pair = generator.generate_object("base prompt".to_string()).await.unwrap();
        assert_eq!(pair, Pair { a: 3 });
        let prompts = handle.prompts();
        assert!(prompts[0].starts_with("base prompt"));
        assert!(prompts[0].contains("## Response Format"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(400);
        let cut = truncate(&long);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 503);
    }
}
