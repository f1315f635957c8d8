//! Model artifact - the frozen output of offline training
//!
//! One JSON document carries everything request-time code needs: the
//! feature layout it was trained on, categorical codes, scaler parameters and
//! the regressor itself. It is checked once at load and treated as read-only
//! afterwards.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::ARTIFACT_FORMAT_VERSION;
use crate::logic::error::{EngineError, EngineResult};
use crate::logic::features::encoder::CategoryCodes;
use crate::logic::features::layout::{self, hash_layout};
use crate::logic::features::StandardScaler;
use super::inference::Regressor;
use super::linear::LinearModel;
use super::trees::TreeEnsemble;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
    #[serde(default)]
    pub samples: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactLayout {
    pub version: u8,
    pub features: Vec<String>,
    /// Optional recorded CRC32; recomputed and compared when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<u32>,
}

impl ArtifactLayout {
    pub fn current() -> Self {
        Self {
            version: layout::FEATURE_VERSION,
            features: layout::FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            hash: Some(layout::layout_hash()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearModel),
    GradientBoosting(TreeEnsemble),
    /// Path is resolved relative to the artifact file
    Onnx { path: String, n_features: usize },
}

impl ModelSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::GradientBoosting(_) => "gradient_boosting",
            Self::Onnx { .. } => "onnx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    pub algorithm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ModelMetrics>,
    pub layout: ArtifactLayout,
    pub categories: CategoryCodes,
    pub scaler: StandardScaler,
    pub model: ModelSpec,
}

/// Hex SHA-256 of the artifact bytes, reported with model info
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

impl ModelArtifact {
    pub fn from_json(text: &str) -> EngineResult<Self> {
        let artifact: Self = serde_json::from_str(text)
            .map_err(|e| EngineError::Artifact(format!("invalid artifact JSON: {}", e)))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read + parse + validate; also returns the checksum of the file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<(Self, String)> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| EngineError::Artifact(format!("cannot read {}: {}", path.display(), e)))?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| EngineError::Artifact(format!("{} is not UTF-8: {}", path.display(), e)))?;

        let artifact = Self::from_json(text)?;
        let sum = checksum(&bytes);
        log::info!(
            "Loaded artifact '{}' ({}) from {} [sha256 {}]",
            artifact.name,
            artifact.model.kind(),
            path.display(),
            &sum[..12]
        );
        Ok((artifact, sum))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::Artifact(format!("cannot serialize artifact: {}", e)))?;
        std::fs::write(path, json)
            .map_err(|e| EngineError::Artifact(format!("cannot write {}: {}", path.display(), e)))
    }

    /// Structural checks that do not need the regressor to be built
    pub fn validate(&self) -> EngineResult<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(EngineError::Artifact(format!(
                "unsupported artifact format v{} (expected v{})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        let computed = hash_layout(self.layout.version, self.layout.features.iter().map(String::as_str));
        if let Some(recorded) = self.layout.hash {
            if recorded != computed {
                return Err(EngineError::Artifact(format!(
                    "recorded layout hash {:08x} does not match features (computed {:08x})",
                    recorded, computed
                )));
            }
        }
        layout::validate_layout(self.layout.version, computed)?;

        match &self.model {
            ModelSpec::Linear(m) => m.validate(),
            ModelSpec::GradientBoosting(m) => m.validate(),
            ModelSpec::Onnx { n_features, .. } if *n_features == 0 => {
                Err(EngineError::Artifact("onnx model declares zero features".to_string()))
            }
            ModelSpec::Onnx { .. } => Ok(()),
        }
    }

    /// Build the regressor; `base_dir` anchors relative ONNX paths
    pub fn build_regressor(&self, base_dir: Option<&Path>) -> EngineResult<Box<dyn Regressor>> {
        match &self.model {
            ModelSpec::Linear(m) => Ok(Box::new(m.clone())),
            ModelSpec::GradientBoosting(m) => Ok(Box::new(m.clone())),
            ModelSpec::Onnx { path, n_features } => {
                let resolved = match base_dir {
                    Some(dir) if Path::new(path).is_relative() => dir.join(path),
                    _ => PathBuf::from(path),
                };
                build_onnx(&resolved, *n_features)
            }
        }
    }
}

#[cfg(feature = "onnx")]
fn build_onnx(path: &Path, n_features: usize) -> EngineResult<Box<dyn Regressor>> {
    let model = super::onnx::OnnxRegressor::load(&path.to_string_lossy(), n_features)?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
fn build_onnx(path: &Path, _n_features: usize) -> EngineResult<Box<dyn Regressor>> {
    Err(EngineError::Artifact(format!(
        "{} is an ONNX model but this build has no `onnx` feature",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_COUNT;

    fn linear_artifact() -> ModelArtifact {
        ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            name: "test-linear".to_string(),
            algorithm: "ols".to_string(),
            trained_at: None,
            metrics: None,
            layout: ArtifactLayout::current(),
            categories: CategoryCodes::ordinal(),
            scaler: StandardScaler::identity(FEATURE_COUNT),
            model: ModelSpec::Linear(LinearModel {
                coefficients: vec![1.0; FEATURE_COUNT],
                intercept: 0.0,
            }),
        }
    }

    #[test]
    fn test_save_load_keeps_checksum_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        linear_artifact().save(&path).unwrap();

        let (loaded, sum1) = ModelArtifact::load(&path).unwrap();
        let (_, sum2) = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded, linear_artifact());
        assert_eq!(sum1, sum2);
        assert_eq!(sum1.len(), 64);
    }

    #[test]
    fn test_reordered_layout_rejected() {
        let mut artifact = linear_artifact();
        artifact.layout.features.swap(0, 1);
        artifact.layout.hash = None;
        assert!(matches!(artifact.validate(), Err(EngineError::Layout(_))));
    }

    #[test]
    fn test_tampered_hash_rejected() {
        let mut artifact = linear_artifact();
        artifact.layout.hash = Some(0xdead_beef);
        assert!(matches!(artifact.validate(), Err(EngineError::Artifact(_))));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut artifact = linear_artifact();
        artifact.format_version = 99;
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ModelArtifact::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EngineError::Artifact(_)));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_requires_feature() {
        let mut artifact = linear_artifact();
        artifact.model = ModelSpec::Onnx { path: "model.onnx".to_string(), n_features: FEATURE_COUNT };
        assert!(artifact.validate().is_ok());
        assert!(artifact.build_regressor(None).is_err());
    }
}
