//! Scenario Module - what-if comparisons against a base input

pub mod types;
pub mod engine;

pub use types::{PresetOutcome, ScenarioKind, ScenarioResult};
pub use engine::ScenarioEngine;
