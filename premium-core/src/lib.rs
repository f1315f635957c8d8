//! InsureAI premium estimation core
//!
//! Validates an applicant profile, encodes it with the artifact's scaler and
//! category codes, and runs the frozen regressor. Scenario comparison and
//! cost drivers sit on top of the same pipeline.

pub mod constants;
pub mod logic;

pub use logic::explain::{CostDriver, Impact};
pub use logic::model::{Estimate, EstimatorStatus, ModelArtifact};
pub use logic::scenario::{PresetOutcome, ScenarioKind, ScenarioResult};
pub use logic::{EngineError, EngineResult, ModelInfo, ModelSource, PremiumEngine, RawInput, Region, Sex, ValidationError};
