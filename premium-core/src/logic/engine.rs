//! Premium Engine - the single entry point used by the server and the CLI
//!
//! Holds one encoder and one estimator built from the same artifact, plus
//! the metadata reported by `/api/v1/model`. Immutable after construction,
//! so it can be shared behind an `Arc` across request handlers.

use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::constants;
use crate::logic::error::{EngineError, EngineResult};
use crate::logic::explain::{self, CostDriver};
use crate::logic::features::{FeatureEncoder, FeatureVector, LayoutInfo};
use crate::logic::input::{RawInput, Region, Sex};
use crate::logic::model::artifact::checksum;
use crate::logic::model::{Estimate, Estimator, EstimatorStatus, ModelArtifact, ModelMetrics};
use crate::logic::scenario::{PresetOutcome, ScenarioEngine, ScenarioKind, ScenarioResult};

const REFERENCE_ARTIFACT: &str = include_str!("../../artifacts/reference_model.json");

static REFERENCE: OnceCell<(ModelArtifact, String)> = OnceCell::new();

/// Where the loaded artifact came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "path", rename_all = "snake_case")]
pub enum ModelSource {
    Bundled,
    File(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub algorithm: String,
    pub kind: String,
    pub trained_at: Option<DateTime<Utc>>,
    pub metrics: Option<ModelMetrics>,
    pub layout: LayoutInfo,
    pub checksum: String,
    pub source: ModelSource,
}

#[derive(Debug)]
pub struct PremiumEngine {
    encoder: FeatureEncoder,
    estimator: Estimator,
    info: ModelInfo,
}

impl PremiumEngine {
    /// Build from an already validated artifact
    pub fn from_artifact(
        artifact: &ModelArtifact,
        checksum: String,
        source: ModelSource,
        base_dir: Option<&Path>,
    ) -> EngineResult<Self> {
        artifact.validate()?;

        let encoder = FeatureEncoder::new(&artifact.categories, artifact.scaler.clone())?;
        let estimator = Estimator::new(artifact.build_regressor(base_dir)?);

        let info = ModelInfo {
            name: artifact.name.clone(),
            algorithm: artifact.algorithm.clone(),
            kind: artifact.model.kind().to_string(),
            trained_at: artifact.trained_at,
            metrics: artifact.metrics.clone(),
            layout: LayoutInfo::current(),
            checksum,
            source,
        };

        let engine = Self { encoder, estimator, info };
        engine.verify()?;
        Ok(engine)
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let (artifact, sum) = ModelArtifact::load(path)?;
        Self::from_artifact(
            &artifact,
            sum,
            ModelSource::File(path.display().to_string()),
            path.parent(),
        )
    }

    /// Engine over the artifact compiled into the crate
    pub fn reference() -> EngineResult<Self> {
        let (artifact, sum) = REFERENCE.get_or_try_init(|| {
            ModelArtifact::from_json(REFERENCE_ARTIFACT)
                .map(|a| (a, checksum(REFERENCE_ARTIFACT.as_bytes())))
        })?;
        Self::from_artifact(artifact, sum.clone(), ModelSource::Bundled, None)
    }

    /// Startup probe: the regressor must accept the encoder's width and
    /// return a finite value for a known-good profile.
    pub fn verify(&self) -> EngineResult<Estimate> {
        let probe = RawInput {
            age: constants::AGE_MIN,
            sex: Sex::Female,
            bmi: 25.0,
            children: 0,
            smoker: false,
            region: Region::Northwest,
        };
        self.estimate(&probe).map_err(|e| {
            if e.is_validation() {
                EngineError::Artifact(format!("probe input rejected: {}", e))
            } else {
                e
            }
        })
    }

    pub fn encode(&self, input: &RawInput) -> EngineResult<FeatureVector> {
        self.encoder.encode(input)
    }

    pub fn estimate(&self, input: &RawInput) -> EngineResult<Estimate> {
        self.scenarios().estimate(input)
    }

    pub fn run_scenario(&self, base: &RawInput, kind: ScenarioKind) -> EngineResult<ScenarioResult> {
        self.scenarios().run_scenario(base, kind)
    }

    pub fn run_presets(&self, base: &RawInput) -> EngineResult<Vec<PresetOutcome>> {
        self.scenarios().run_presets(base)
    }

    pub fn cost_drivers(&self, input: &RawInput) -> EngineResult<Vec<CostDriver>> {
        input.validate()?;
        Ok(explain::cost_drivers(input))
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn status(&self) -> EstimatorStatus {
        self.estimator.status()
    }

    fn scenarios(&self) -> ScenarioEngine<'_> {
        ScenarioEngine::new(&self.encoder, &self.estimator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::{LinearModel, ModelSpec};

    fn example(smoker: bool) -> RawInput {
        RawInput {
            age: 26,
            sex: Sex::Female,
            bmi: 25.0,
            children: 0,
            smoker,
            region: Region::Southeast,
        }
    }

    #[test]
    fn test_reference_loads() {
        let engine = PremiumEngine::reference().unwrap();
        let info = engine.model_info();
        assert_eq!(info.kind, "gradient_boosting");
        assert_eq!(info.source, ModelSource::Bundled);
        assert_eq!(info.checksum.len(), 64);
        assert_eq!(info.layout.feature_count, 6);
    }

    #[test]
    fn test_reference_claims_no_training_metrics() {
        let engine = PremiumEngine::reference().unwrap();
        let info = engine.model_info();
        assert!(info.metrics.is_none());
        assert!(info.name.contains("synthetic"));
        assert!(info.trained_at.is_none());
    }

    #[test]
    fn test_startup_rejects_model_narrower_than_layout() {
        let mut artifact = ModelArtifact::from_json(REFERENCE_ARTIFACT).unwrap();
        artifact.model = ModelSpec::Linear(LinearModel {
            coefficients: vec![1.0; 5],
            intercept: 0.0,
        });

        let err = PremiumEngine::from_artifact(&artifact, String::new(), ModelSource::Bundled, None).unwrap_err();
        assert_eq!(err, EngineError::ShapeMismatch { expected: 5, actual: 6 });
    }

    #[test]
    fn test_reference_example_profile() {
        let engine = PremiumEngine::reference().unwrap();
        let smoker = engine.estimate(&example(true)).unwrap();
        let non_smoker = engine.estimate(&example(false)).unwrap();
        assert!((smoker.cost() - 14168.0).abs() < 0.01, "{}", smoker.cost());
        assert!((non_smoker.cost() - 1614.0).abs() < 0.01, "{}", non_smoker.cost());
    }

    #[test]
    fn test_status_counts_estimates() {
        let engine = PremiumEngine::reference().unwrap();
        let before = engine.status().estimate_count;
        engine.estimate(&example(false)).unwrap();
        assert_eq!(engine.status().estimate_count, before + 1);
    }

    #[test]
    fn test_cost_drivers_validate_input() {
        let engine = PremiumEngine::reference().unwrap();
        let bad = RawInput { bmi: 70.0, ..example(false) };
        assert!(engine.cost_drivers(&bad).unwrap_err().is_validation());
        assert_eq!(engine.cost_drivers(&example(true)).unwrap().len(), 4);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, REFERENCE_ARTIFACT).unwrap();

        let engine = PremiumEngine::load(&path).unwrap();
        assert!(matches!(engine.model_info().source, ModelSource::File(_)));
        assert_eq!(engine.model_info().checksum, checksum(REFERENCE_ARTIFACT.as_bytes()));
    }

    #[test]
    fn test_load_rejects_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(PremiumEngine::load(&path), Err(EngineError::Artifact(_))));
    }
}
