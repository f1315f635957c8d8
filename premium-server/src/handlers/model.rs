//! Model insight handler

use axum::{extract::State, Json};
use premium_core::constants::{APP_NAME, APP_VERSION};
use premium_core::{EstimatorStatus, ModelInfo};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub app: &'static str,
    pub engine_version: &'static str,
    pub model: ModelInfo,
    pub status: EstimatorStatus,
}

pub async fn info(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse {
        app: APP_NAME,
        engine_version: APP_VERSION,
        model: state.engine.model_info().clone(),
        status: state.engine.status(),
    })
}
