use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ok, present, ApiResult, SharedState};
use crate::error::ApiError;
use crate::progress::{
    CompletionDetails, DailyProgress, HistoryEntry, ProgressExport, Task, UserStats, DEFAULT_HISTORY_DAYS,
    STREAK_WINDOW_DAYS,
};

#[derive(Debug, Serialize)]
pub struct ProgressOverview {
    today: DailyProgress,
    stats: UserStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    task: Option<String>,
    completed: Option<bool>,
    words_learned: Option<u32>,
    score: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    days: Option<u32>,
}

pub async fn overview(State(state): State<SharedState>) -> ApiResult<ProgressOverview> {
    let now = Utc::now();
    let today = state.progress.today(now.date_naive()).await?;
    let stats = state.progress.stats(now).await?;
    Ok(ok(ProgressOverview { today, stats }, "Progress retrieved successfully"))
}

pub async fn update(
    State(state): State<SharedState>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> ApiResult<ProgressOverview> {
    let Json(body) = payload?;
    let task: Task = present(body.task)
        .ok_or_else(|| ApiError::BadRequest("Missing task".to_string()))?
        .parse()
        .map_err(ApiError::BadRequest)?;
    let details = CompletionDetails { words_learned: body.words_learned, score: body.score };

    let (today, stats) = state
        .progress
        .update_task(task, body.completed.unwrap_or(true), details, Utc::now())
        .await?;
    Ok(ok(ProgressOverview { today, stats }, "Progress updated successfully"))
}

pub async fn history(
    State(state): State<SharedState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> ApiResult<Vec<HistoryEntry>> {
    let Query(params) = params?;
    let days = params.days.unwrap_or(DEFAULT_HISTORY_DAYS).clamp(1, STREAK_WINDOW_DAYS as u32);
    let entries = state.progress.history(Utc::now().date_naive(), days).await?;
    Ok(ok(entries, "Progress history retrieved successfully"))
}

pub async fn export(State(state): State<SharedState>) -> ApiResult<ProgressExport> {
    let export = state.progress.export(Utc::now()).await?;
    Ok(ok(export, "Progress exported successfully"))
}

pub async fn reset(State(state): State<SharedState>) -> ApiResult<()> {
    state.progress.reset().await?;
    Ok(ok((), "Progress reset successfully"))
}
