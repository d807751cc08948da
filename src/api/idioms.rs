use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{merge_update, present, serve_today, ApiResult, SharedState};
use crate::content;
use crate::content::evaluation::evaluate_idiom_usage;
use crate::content::idioms::MASTERY_SCORE;
use crate::error::ApiError;
use crate::models::{self, date_key, Idiom, IdiomEvaluation};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdiomUpdate {
    idiom_id: Option<String>,
    updates: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdiomAttempt {
    idiom_id: Option<String>,
    user_sentence: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IdiomFeedback {
    success: bool,
    evaluation: IdiomEvaluation,
}

pub async fn today(State(state): State<SharedState>) -> ApiResult<Vec<Idiom>> {
    let date = date_key(models::today());
    serve_today(
        &state.idioms,
        &date,
        || content::idioms::generate(&state.generator, &date),
        "Today's idioms already generated",
        "Idioms generated successfully",
    )
    .await
}

pub async fn update(
    State(state): State<SharedState>,
    payload: Result<Json<IdiomUpdate>, JsonRejection>,
) -> ApiResult<Idiom> {
    let Json(body) = payload?;
    merge_update(&state.idioms, body.idiom_id, body.updates, "Missing idiomId or updates").await
}

/// Grade a sentence written with one of the stored idioms and record the attempt.
pub async fn evaluate(
    State(state): State<SharedState>,
    payload: Result<Json<IdiomAttempt>, JsonRejection>,
) -> Result<Json<IdiomFeedback>, ApiError> {
    let Json(body) = payload?;
    let (Some(idiom_id), Some(sentence)) = (present(body.idiom_id), present(body.user_sentence)) else {
        return Err(ApiError::BadRequest("Missing idiomId or userSentence".to_string()));
    };

    let not_found = || ApiError::NotFound("Idiom not found".to_string());
    let idiom = state.idioms.get(&idiom_id).await?.ok_or_else(not_found)?;
    let evaluation = evaluate_idiom_usage(&state.generator, &idiom.idiom, &idiom.meaning, &sentence).await;
    let mastered = evaluation.score >= MASTERY_SCORE;

    state
        .idioms
        .update(&idiom_id, |record| {
            record.user_sentence = Some(sentence);
            record.practiced = true;
            record.mastered = mastered;
            Ok::<(), ApiError>(())
        })
        .await?
        .ok_or_else(not_found)?;
    info!(idiom = %idiom.idiom, score = evaluation.score, mastered, "idiom attempt recorded");

    Ok(Json(IdiomFeedback { success: true, evaluation }))
}
