use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{merge_update, serve_today, ApiResult, SharedState};
use crate::content;
use crate::models::{self, date_key, NewsItem};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsUpdate {
    news_id: Option<String>,
    updates: Option<Value>,
}

pub async fn today(State(state): State<SharedState>) -> ApiResult<Vec<NewsItem>> {
    let date = date_key(models::today());
    serve_today(
        &state.news,
        &date,
        || content::news::generate(&state.generator, &date),
        "Today's news already generated",
        "Current affairs generated successfully",
    )
    .await
}

/// Used by the reader to flag items as read.
pub async fn update(
    State(state): State<SharedState>,
    payload: Result<Json<NewsUpdate>, JsonRejection>,
) -> ApiResult<NewsItem> {
    let Json(body) = payload?;
    merge_update(&state.news, body.news_id, body.updates, "Missing newsId or updates").await
}
