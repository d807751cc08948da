use async_trait::async_trait;
use std::fmt::Debug;

pub type InterceptorResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Receives every prompt/response pair exchanged with the model.
#[async_trait]
pub trait Interceptor: Send + Sync + Debug {
    async fn save(&self, prompt: &str, response: &str) -> InterceptorResult;
}

pub mod file;
pub use file::FileInterceptor;
