//! Engine error taxonomy
//!
//! Every failure of encode / estimate / scenario surfaces as one of these.

use thiserror::Error;

use crate::logic::features::layout::LayoutMismatchError;

pub type EngineResult<T> = Result<T, EngineError>;

/// An input field outside its declared domain
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {value} (allowed: {allowed})")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub allowed: String,
}

impl ValidationError {
    pub fn new(field: &'static str, value: impl ToString, allowed: impl Into<String>) -> Self {
        Self {
            field,
            value: value.to_string(),
            allowed: allowed.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("feature vector has {actual} values but the model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("estimation failed: {0}")]
    Estimation(String),

    #[error("model artifact error: {0}")]
    Artifact(String),
}

impl EngineError {
    /// Recoverable by fixing the request
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
