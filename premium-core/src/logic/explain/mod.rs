//! Explain Module - qualitative cost drivers next to an estimate

pub mod types;
pub mod engine;

pub use types::{CostDriver, Impact};
pub use engine::cost_drivers;
