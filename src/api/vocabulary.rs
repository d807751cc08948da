use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{merge_update, serve_today, ApiResult, SharedState};
use crate::content;
use crate::models::{self, date_key, VocabularyWord};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordUpdate {
    word_id: Option<String>,
    updates: Option<Value>,
}

pub async fn today(State(state): State<SharedState>) -> ApiResult<Vec<VocabularyWord>> {
    let date = date_key(models::today());
    serve_today(
        &state.vocabulary,
        &date,
        || content::vocabulary::generate(&state.generator, &date),
        "Today's vocabulary already generated",
        "Vocabulary generated successfully",
    )
    .await
}

pub async fn update(
    State(state): State<SharedState>,
    payload: Result<Json<WordUpdate>, JsonRejection>,
) -> ApiResult<VocabularyWord> {
    let Json(body) = payload?;
    merge_update(&state.vocabulary, body.word_id, body.updates, "Missing wordId or updates").await
}
