//! Central Configuration Constants
//!
//! Single source of truth for input domains and scenario defaults.
//! The HTTP layer and the artifact tool both read from here.

/// Youngest insurable age (inclusive)
pub const AGE_MIN: u32 = 18;

/// Oldest insurable age (inclusive)
pub const AGE_MAX: u32 = 64;

/// Lowest accepted BMI (inclusive)
pub const BMI_MIN: f64 = 15.0;

/// Highest accepted BMI (inclusive)
pub const BMI_MAX: f64 = 55.0;

/// Maximum number of dependents
pub const CHILDREN_MAX: u32 = 5;

/// BMI points removed by the "lose weight" preset
pub const WEIGHT_LOSS_BMI_POINTS: f64 = 5.0;

/// Years added by the "project ahead" preset
pub const DEFAULT_PROJECTION_YEARS: u32 = 10;

/// Artifact format understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Environment variable pointing to a model artifact
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";

/// Crate version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product name
pub const APP_NAME: &str = "InsureAI";

/// Get the artifact path from environment, if any
pub fn get_model_path() -> Option<String> {
    std::env::var(MODEL_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
}
