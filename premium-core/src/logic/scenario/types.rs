//! Scenario types

use serde::{Deserialize, Serialize};

use crate::constants::{BMI_MIN, DEFAULT_PROJECTION_YEARS, WEIGHT_LOSS_BMI_POINTS};
use crate::logic::error::EngineResult;
use crate::logic::input::{self, RawInput, Region};
use crate::logic::model::Estimate;

/// A single what-if perturbation of a base input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioKind {
    QuitSmoking,
    TargetBmi { value: f64 },
    ChangeRegion { region: Region },
    AgeProjection { years: u32 },
}

impl ScenarioKind {
    pub fn label(&self) -> String {
        match self {
            Self::QuitSmoking => "Quit smoking".to_string(),
            Self::TargetBmi { value } => format!("Reach BMI {:.1}", value),
            Self::ChangeRegion { region } => format!("Move to {}", region),
            Self::AgeProjection { years } => format!("Project {} years ahead", years),
        }
    }

    /// Perturbed copy of `base`; the result is re-validated by the encoder,
    /// the checks here only name the scenario's own field.
    pub fn apply(&self, base: &RawInput) -> EngineResult<RawInput> {
        let mut modified = *base;
        match *self {
            Self::QuitSmoking => modified.smoker = false,
            Self::TargetBmi { value } => {
                input::validate_bmi(value)?;
                modified.bmi = value;
            }
            Self::ChangeRegion { region } => modified.region = region,
            Self::AgeProjection { years } => {
                let projected = base.age.saturating_add(years);
                input::validate_age(projected)?;
                modified.age = projected;
            }
        }
        Ok(modified)
    }

    /// The four what-ifs offered next to a fresh prediction
    pub fn presets(base: &RawInput) -> Vec<ScenarioKind> {
        vec![
            Self::QuitSmoking,
            Self::TargetBmi { value: (base.bmi - WEIGHT_LOSS_BMI_POINTS).max(BMI_MIN) },
            Self::ChangeRegion { region: base.region.next() },
            Self::AgeProjection { years: DEFAULT_PROJECTION_YEARS },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub label: String,
    pub scenario: ScenarioKind,
    pub base_estimate: Estimate,
    pub adjusted_estimate: Estimate,
    pub adjusted_input: RawInput,
    /// adjusted − base
    pub delta: f64,
    /// delta as a percentage of base; `None` when base is zero
    pub delta_pct: Option<f64>,
    /// false when the perturbation left the input as it was
    pub changed: bool,
}

/// One preset's outcome; a failing preset does not sink the others
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PresetOutcome {
    Ok(ScenarioResult),
    Rejected { scenario: ScenarioKind, label: String, error: String },
}
