use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;

use crate::clients::{ClientType, FlexibleClient};
use crate::core::ContentGenerator;
use crate::interceptors::FileInterceptor;

/// Trait for types that can retrieve their configuration key from environment variables
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Older variable names still honoured when `KEY_NAME` is unset
    const FALLBACK_KEY_NAMES: &'static [&'static str] = &[];

    /// Find the API key by checking environment variables first, then .env file
    fn find_key() -> Option<String> {
        // First try to load .env file (silently fail if not found)
        let _ = dotenvy::dotenv();

        std::iter::once(Self::KEY_NAME)
            .chain(Self::FALLBACK_KEY_NAMES.iter().copied())
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }

    /// Whether a usable key is present, without returning it
    fn has_key() -> bool {
        Self::find_key().is_some()
    }
}

/// Which persistence backend holds the daily content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// One pretty-printed JSON array per content type under the data directory
    File,
    /// Process memory only; everything is lost on restart
    Memory,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::File => write!(f, "file"),
            StorageKind::Memory => write!(f, "memory"),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub storage: StorageKind,
    pub provider: ClientType,
    pub transcript_dir: Option<PathBuf>,
    /// Append the expected JSON schema to every prompt
    pub schema_guidance: bool,
}

impl AppConfig {
    /// Generator around `client` with this configuration's prompt options and transcript recording.
    pub fn generator(&self, client: FlexibleClient) -> ContentGenerator<FlexibleClient> {
        let generator = ContentGenerator::new(client).with_schema_guidance(self.schema_guidance);
        match &self.transcript_dir {
            Some(dir) => generator.with_interceptor(Arc::new(FileInterceptor::new(dir.clone()))),
            None => generator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestKeys;

    impl KeyFromEnv for TestKeys {
        const KEY_NAME: &'static str = "DAILY_PREP_TEST_PRIMARY_KEY";
        const FALLBACK_KEY_NAMES: &'static [&'static str] = &["DAILY_PREP_TEST_LEGACY_KEY"];
    }

    #[test]
    fn fallback_key_is_used_when_primary_missing() {
        env::remove_var("DAILY_PREP_TEST_PRIMARY_KEY");
        env::set_var("DAILY_PREP_TEST_LEGACY_KEY", "legacy");
        assert_eq!(TestKeys::find_key().as_deref(), Some("legacy"));

        env::set_var("DAILY_PREP_TEST_PRIMARY_KEY", "primary");
        assert_eq!(TestKeys::find_key().as_deref(), Some("primary"));

        env::remove_var("DAILY_PREP_TEST_PRIMARY_KEY");
        env::remove_var("DAILY_PREP_TEST_LEGACY_KEY");
        assert!(!TestKeys::has_key());
    }

    fn config(schema_guidance: bool, transcript_dir: Option<PathBuf>) -> AppConfig {
        AppConfig {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_dir: PathBuf::from("data"),
            storage: StorageKind::Memory,
            provider: ClientType::Mock,
            transcript_dir,
            schema_guidance,
        }
    }

    #[tokio::test]
    async fn generator_follows_schema_guidance_setting() {
        let (client, handle) = FlexibleClient::mock();
        handle.push_success("{}");
        handle.push_success("{}");

        let plain = config(false, None).generator(client.clone());
        plain.ask("plain prompt".to_string()).await.unwrap();
        let _: serde_json::Value = config(true, None)
            .generator(client)
            .generate_object("guided prompt".to_string())
            .await
            .unwrap();

        let prompts = handle.prompts();
        assert_eq!(prompts[0], "plain prompt");
        assert!(prompts[1].starts_with("guided prompt"));
        assert!(prompts[1].contains("## Response Format"));
    }

    #[tokio::test]
    async fn generator_records_transcripts_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let (client, handle) = FlexibleClient::mock();
        handle.push_success("[\"ok\"]");

        let generator = config(false, Some(dir.path().to_path_buf())).generator(client);
        generator.ask("record me".to_string()).await.unwrap();

        let written = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(written, 1);
    }
}
