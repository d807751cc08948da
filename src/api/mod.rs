//! HTTP surface: one axum router over shared application state.
//!
//! Content routes answer with `{ success, data, message }`; failures go
//! through `ApiError`.

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::clients::FlexibleClient;
use crate::core::{ContentGenerator, LowLevelClient};
use crate::error::ApiError;
use crate::models::{GKFact, GKQuestion, Idiom, NewsItem, PracticeSession, VocabularyWord};
use crate::progress::ProgressTracker;
use crate::storage::{DailyContent, DailyRepository, Store};

mod daily_gk;
mod evaluate;
mod idioms;
mod news;
mod practice;
mod progress;
mod quiz;
mod vocabulary;

pub type SharedState = Arc<AppState>;

/// Everything a handler can reach.
#[derive(Debug)]
pub struct AppState {
    pub generator: ContentGenerator<FlexibleClient>,
    pub store: Arc<dyn Store>,
    pub vocabulary: DailyRepository<VocabularyWord>,
    pub idioms: DailyRepository<Idiom>,
    pub questions: DailyRepository<GKQuestion>,
    pub news: DailyRepository<NewsItem>,
    pub facts: DailyRepository<GKFact>,
    pub practice: DailyRepository<PracticeSession>,
    pub progress: ProgressTracker,
}

impl AppState {
    pub fn new(generator: ContentGenerator<FlexibleClient>, store: Arc<dyn Store>) -> Self {
        Self {
            generator,
            vocabulary: DailyRepository::new(store.clone()),
            idioms: DailyRepository::new(store.clone()),
            questions: DailyRepository::new(store.clone()),
            news: DailyRepository::new(store.clone()),
            facts: DailyRepository::new(store.clone()),
            practice: DailyRepository::new(store.clone()),
            progress: ProgressTracker::new(store.clone()),
            store,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/vocabulary", get(vocabulary::today).post(vocabulary::update))
        .route("/api/idioms", get(idioms::today).post(idioms::update))
        .route("/api/evaluate-idiom", post(idioms::evaluate))
        .route("/api/news", get(news::today).post(news::update))
        .route("/api/quiz", get(quiz::today).post(quiz::answer))
        .route("/api/daily-gk", get(daily_gk::today).post(daily_gk::update))
        .route("/api/practice", get(practice::summary).post(practice::evaluate))
        .route("/api/evaluate-sentence", post(evaluate::sentence))
        .route(
            "/api/progress",
            get(progress::overview).post(progress::update).delete(progress::reset),
        )
        .route("/api/progress/history", get(progress::history))
        .route("/api/progress/export", get(progress::export))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

pub(crate) fn ok<T: Serialize>(data: T, message: impl Into<String>) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data, message: message.into() })
}

/// Treat blank strings like missing ones.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Today's batch for `repo`, generated on first request of the day.
pub(crate) async fn serve_today<T, F, Fut>(
    repo: &DailyRepository<T>,
    date: &str,
    generate: F,
    cached_message: &'static str,
    generated_message: &'static str,
) -> ApiResult<Vec<T>>
where
    T: DailyContent,
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Vec<T>> + Send,
{
    let (items, cached) = repo.todays_or_generate(date, generate).await?;
    Ok(ok(items, if cached { cached_message } else { generated_message }))
}

/// Shared body of the `{ <kind>Id, updates }` POST routes.
pub(crate) async fn merge_update<T: DailyContent>(
    repo: &DailyRepository<T>,
    id: Option<String>,
    updates: Option<Value>,
    missing_message: &'static str,
) -> ApiResult<T> {
    let (Some(id), Some(updates)) = (present(id), updates) else {
        return Err(ApiError::BadRequest(missing_message.to_string()));
    };
    let updated = repo
        .merge(&id, &updates)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", T::NOUN)))?;
    Ok(ok(updated, format!("{} updated successfully", T::NOUN)))
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub provider: &'static str,
    pub storage: String,
}

async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        provider: state.generator.client().provider_name(),
        storage: state.store.kind().to_string(),
    })
}
