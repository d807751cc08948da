use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::{ok, present, serve_today, ApiResult, SharedState};
use crate::content;
use crate::content::quiz::{record_answer, AnswerOutcome};
use crate::error::ApiError;
use crate::models::{self, date_key, GKQuestion};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    question_id: Option<String>,
    user_answer: Option<String>,
}

pub async fn today(State(state): State<SharedState>) -> ApiResult<Vec<GKQuestion>> {
    let date = date_key(models::today());
    serve_today(
        &state.questions,
        &date,
        || content::quiz::generate(&state.generator, &date),
        "Today's GK questions already generated",
        "GK questions generated successfully",
    )
    .await
}

pub async fn answer(
    State(state): State<SharedState>,
    payload: Result<Json<AnswerSubmission>, JsonRejection>,
) -> ApiResult<AnswerOutcome> {
    let Json(body) = payload?;
    let (Some(question_id), Some(user_answer)) = (present(body.question_id), present(body.user_answer)) else {
        return Err(ApiError::BadRequest("Missing questionId or userAnswer".to_string()));
    };

    let mut outcome = None;
    state
        .questions
        .update(&question_id, |question| {
            outcome = Some(record_answer(question, &user_answer));
            Ok::<(), ApiError>(())
        })
        .await?;

    let outcome = outcome.ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;
    let message = outcome.message();
    Ok(ok(outcome, message))
}
