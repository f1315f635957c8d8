//! Logic Module - premium estimation
//!
//! - `input` - applicant profile and its domains
//! - `features/` - layout, scaler, encoder
//! - `model/` - artifact, regressors, estimator, offline fitting
//! - `scenario/` - what-if comparisons
//! - `explain/` - qualitative cost drivers
//! - `engine` - `PremiumEngine`, the facade over all of the above

pub mod error;
pub mod input;
pub mod features;
pub mod model;
pub mod scenario;
pub mod explain;
pub mod engine;

pub use engine::{ModelInfo, ModelSource, PremiumEngine};
pub use error::{EngineError, EngineResult, ValidationError};
pub use input::{RawInput, Region, Sex};
