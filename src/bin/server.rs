use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use daily_prep::clients::{ClientType, FlexibleClient};
use daily_prep::config::{AppConfig, StorageKind};
use daily_prep::{router, storage, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily SSC CGL preparation content service", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    GEMINI_API_KEY     API key for Gemini (GOOGLE_AI_API_KEY is also accepted)
    DEEPSEEK_API_KEY   API key for DeepSeek
    RUST_LOG           Log filter [default: daily_prep=info,tower_http=info]

EXAMPLES:
    daily-prep                                  # Auto-detect provider, store under ./data
    daily-prep --provider mock --storage memory # Offline, fallback content only
    daily-prep --transcript-dir transcripts     # Keep every prompt and response
    daily-prep --schema-guidance                # Send the expected JSON schema with each prompt")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "DAILY_PREP_ADDR", default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Directory holding the JSON data files
    #[arg(long, env = "DAILY_PREP_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Persistence backend
    #[arg(long, env = "DAILY_PREP_STORAGE", value_enum, default_value_t = StorageKind::File)]
    storage: StorageKind,

    /// Model provider: gemini, deepseek, mock [default: auto-detect from API keys]
    #[arg(long, env = "DAILY_PREP_PROVIDER", value_parser = ClientType::from_str)]
    provider: Option<ClientType>,

    /// Write each prompt/response exchange to this directory
    #[arg(long, env = "DAILY_PREP_TRANSCRIPTS")]
    transcript_dir: Option<PathBuf>,

    /// Append the JSON schema of the expected reply to every prompt
    #[arg(long, env = "DAILY_PREP_SCHEMA_GUIDANCE")]
    schema_guidance: bool,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            addr: args.addr,
            data_dir: args.data_dir,
            storage: args.storage,
            provider: args.provider.unwrap_or_default(),
            transcript_dir: args.transcript_dir,
            schema_guidance: args.schema_guidance,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("daily_prep=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from(Args::parse());
    info!(provider = %config.provider, storage = %config.storage, data_dir = %config.data_dir.display(), "starting daily-prep");

    let store = storage::open(config.storage, config.data_dir.clone());
    if let Some(dir) = &config.transcript_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating transcript directory {}", dir.display()))?;
        info!(dir = %dir.display(), "recording model transcripts");
    }
    info!(enabled = config.schema_guidance, "schema guidance");
    let generator = config.generator(FlexibleClient::from_type(config.provider));

    let app = router(AppState::new(generator, store).shared());
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
