pub mod api;
pub mod clients;
pub mod config;
pub mod content;
pub mod core;
pub mod error;
pub mod interceptors;
pub mod json_utils;
pub mod models;
pub mod progress;
pub mod storage;

// Convenient re-exports
pub use api::{router, AppState, SharedState};
pub use config::AppConfig;
pub use crate::core::{ContentGenerator, LowLevelClient};
