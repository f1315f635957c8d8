//! Scenario handlers

use axum::{extract::State, Json};
use premium_core::{PresetOutcome, ScenarioKind, ScenarioResult};
use serde::{Deserialize, Serialize};

use crate::extract::AppJson;
use crate::handlers::predictions::ProfileRequest;
use crate::middleware::auth::UserContext;
use crate::{AppState, AppResult};

#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    pub base: ProfileRequest,
    pub scenario: ScenarioKind,
}

#[derive(Debug, Serialize)]
pub struct PresetsResponse {
    pub presets: Vec<PresetOutcome>,
}

/// POST /api/v1/scenarios
pub async fn run(
    State(state): State<AppState>,
    _user: UserContext,
    AppJson(req): AppJson<ScenarioRequest>,
) -> AppResult<Json<ScenarioResult>> {
    let base = req.base.to_input()?;
    let result = state.engine.run_scenario(&base, req.scenario)?;
    Ok(Json(result))
}

/// POST /api/v1/scenarios/presets
pub async fn presets(
    State(state): State<AppState>,
    _user: UserContext,
    AppJson(req): AppJson<ProfileRequest>,
) -> AppResult<Json<PresetsResponse>> {
    let base = req.to_input()?;
    let presets = state.engine.run_presets(&base)?;
    Ok(Json(PresetsResponse { presets }))
}
