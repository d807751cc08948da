use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::{present, SharedState};
use crate::content::evaluation::evaluate_sentence;
use crate::error::ApiError;
use crate::models::SentenceEvaluation;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceAttempt {
    word: Option<String>,
    sentence: Option<String>,
    word_meaning: Option<String>,
}

/// Returns the bare evaluation rather than an envelope. Once the input is
/// valid this always answers 200, using a fallback when the model fails.
pub async fn sentence(
    State(state): State<SharedState>,
    payload: Result<Json<SentenceAttempt>, JsonRejection>,
) -> Result<Json<SentenceEvaluation>, ApiError> {
    let Json(body) = payload?;
    let (Some(word), Some(sentence)) = (present(body.word), present(body.sentence)) else {
        return Err(ApiError::BadRequest("Word and sentence are required".to_string()));
    };
    let meaning = present(body.word_meaning);
    let evaluation = evaluate_sentence(&state.generator, &word, &sentence, meaning.as_deref()).await;
    Ok(Json(evaluation))
}
