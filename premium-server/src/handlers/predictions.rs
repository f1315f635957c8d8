//! Prediction handlers - estimate, record, history

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use premium_core::constants::{AGE_MAX, AGE_MIN, CHILDREN_MAX};
use premium_core::{CostDriver, Estimate, RawInput, ValidationError};
use serde::{Deserialize, Serialize};

use crate::extract::AppJson;
use crate::middleware::auth::UserContext;
use crate::models::{HistorySummary, PredictionRecord};
use crate::{AppState, AppResult};

/// Applicant profile as sent by clients. Fields arrive loosely typed
/// (signed integers, strings) so out-of-domain values become a 400 naming
/// the field instead of a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub age: i64,
    pub sex: String,
    pub bmi: f64,
    pub children: i64,
    pub smoker: bool,
    pub region: String,
}

impl ProfileRequest {
    pub fn to_input(&self) -> Result<RawInput, ValidationError> {
        let age = u32::try_from(self.age)
            .map_err(|_| ValidationError::new("age", self.age, format!("{}..={}", AGE_MIN, AGE_MAX)))?;
        let children = u32::try_from(self.children)
            .map_err(|_| ValidationError::new("children", self.children, format!("0..={}", CHILDREN_MAX)))?;

        Ok(RawInput {
            age,
            sex: self.sex.parse()?,
            bmi: self.bmi,
            children,
            smoker: self.smoker,
            region: self.region.parse()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct EstimateView {
    pub annual: f64,
    pub monthly: f64,
    pub weekly: f64,
    pub clamped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<std::collections::BTreeMap<String, f64>>,
}

impl From<&Estimate> for EstimateView {
    fn from(e: &Estimate) -> Self {
        Self {
            annual: e.cost(),
            monthly: e.monthly(),
            weekly: e.weekly(),
            clamped: e.clamped(),
            breakdown: e.breakdown().cloned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub id: i64,
    pub estimate: EstimateView,
    pub cost_drivers: Vec<CostDriver>,
    pub model_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub summary: HistorySummary,
    pub records: Vec<PredictionRecord>,
}

/// POST /api/v1/predictions
pub async fn create(
    State(state): State<AppState>,
    user: UserContext,
    AppJson(req): AppJson<ProfileRequest>,
) -> AppResult<(StatusCode, Json<PredictionResponse>)> {
    let input = req.to_input()?;
    let estimate = state.engine.estimate(&input)?;
    let cost_drivers = state.engine.cost_drivers(&input)?;
    let model_name = &state.engine.model_info().name;

    let record = PredictionRecord::record(
        &state.pool,
        &user.user_id,
        &input,
        &estimate,
        model_name,
        Utc::now(),
    )
    .await?;

    tracing::debug!(user = %user.username, cost = estimate.cost(), "Prediction recorded");

    Ok((
        StatusCode::CREATED,
        Json(PredictionResponse {
            id: record.id,
            estimate: EstimateView::from(&estimate),
            cost_drivers,
            model_name: record.model_name,
            created_at: record.created_at,
        }),
    ))
}

/// GET /api/v1/predictions
pub async fn list(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<HistoryResponse>> {
    let records = PredictionRecord::list_for(&state.pool, &user.user_id).await?;
    Ok(Json(HistoryResponse {
        summary: HistorySummary::from_records(&records),
        records,
    }))
}
