use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ok, present, ApiResult, SharedState};
use crate::content::evaluation::evaluate_practice;
use crate::content::practice::{new_session, summarize, PracticeSummary};
use crate::error::ApiError;
use crate::models::{self, date_key, PracticeEvaluation, PracticeKind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeAttempt {
    user_sentence: Option<String>,
    target_word: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    evaluation: PracticeEvaluation,
    session_id: String,
}

pub async fn evaluate(
    State(state): State<SharedState>,
    payload: Result<Json<PracticeAttempt>, JsonRejection>,
) -> ApiResult<PracticeResult> {
    let Json(body) = payload?;
    let (Some(sentence), Some(target_word), Some(kind)) =
        (present(body.user_sentence), present(body.target_word), present(body.kind))
    else {
        return Err(ApiError::BadRequest(
            "Missing required fields: userSentence, targetWord, type".to_string(),
        ));
    };
    let kind: PracticeKind = kind.parse().map_err(ApiError::BadRequest)?;

    let evaluation = evaluate_practice(&state.generator, &sentence, &target_word).await;
    let session = new_session(kind, &target_word, &sentence, evaluation.clone(), Utc::now());
    let session_id = session.id.clone();
    state.practice.append(vec![session]).await?;

    Ok(ok(PracticeResult { evaluation, session_id }, "Practice evaluated successfully"))
}

pub async fn summary(State(state): State<SharedState>) -> ApiResult<PracticeSummary> {
    let sessions = state.practice.all().await?;
    let summary = summarize(sessions, &date_key(models::today()));
    Ok(ok(summary, "Practice sessions retrieved successfully"))
}
