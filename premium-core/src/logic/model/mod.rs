//! Model Module - frozen regressor and its artifact
//!
//! Inference is split from artifact loading so the regressor can be swapped
//! (linear, boosted trees, ONNX) without touching encoder or scenarios.

pub mod artifact;
pub mod inference;
pub mod linear;
pub mod trees;
pub mod training;

#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use artifact::{ModelArtifact, ModelMetrics, ModelSpec};
pub use inference::{Estimate, Estimator, EstimatorStatus, Regressor};
pub use linear::LinearModel;
pub use trees::{RegressionTree, TreeEnsemble, TreeNode};
pub use training::{fit_linear_artifact, TrainingSample};
