use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{merge_update, serve_today, ApiResult, SharedState};
use crate::content;
use crate::models::{self, date_key, GKFact};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactUpdate {
    fact_id: Option<String>,
    updates: Option<Value>,
}

pub async fn today(State(state): State<SharedState>) -> ApiResult<Vec<GKFact>> {
    let date = date_key(models::today());
    serve_today(
        &state.facts,
        &date,
        || content::daily_gk::generate(&state.generator, &date),
        "Today's GK facts already generated",
        "Daily GK facts generated successfully",
    )
    .await
}

pub async fn update(
    State(state): State<SharedState>,
    payload: Result<Json<FactUpdate>, JsonRejection>,
) -> ApiResult<GKFact> {
    let Json(body) = payload?;
    merge_update(&state.facts, body.fact_id, body.updates, "Missing factId or updates").await
}
