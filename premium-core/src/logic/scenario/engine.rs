//! Scenario Engine
//!
//! Clone the base input, perturb one field, push both through the same
//! encoder → estimator pipeline and report the difference. Scenarios never
//! compose: every call starts again from the caller's base input.

use crate::logic::error::EngineResult;
use crate::logic::features::FeatureEncoder;
use crate::logic::input::RawInput;
use crate::logic::model::{Estimate, Estimator};
use super::types::{PresetOutcome, ScenarioKind, ScenarioResult};

#[derive(Debug, Clone, Copy)]
pub struct ScenarioEngine<'a> {
    encoder: &'a FeatureEncoder,
    estimator: &'a Estimator,
}

impl<'a> ScenarioEngine<'a> {
    pub fn new(encoder: &'a FeatureEncoder, estimator: &'a Estimator) -> Self {
        Self { encoder, estimator }
    }

    pub fn estimate(&self, input: &RawInput) -> EngineResult<Estimate> {
        let vector = self.encoder.encode(input)?;
        self.estimator.estimate(&vector)
    }

    pub fn run_scenario(&self, base: &RawInput, kind: ScenarioKind) -> EngineResult<ScenarioResult> {
        let base_estimate = self.estimate(base)?;
        self.compare(base, base_estimate, kind)
    }

    /// Evaluate every preset against one base estimate. Only an invalid base
    /// fails the whole call.
    pub fn run_presets(&self, base: &RawInput) -> EngineResult<Vec<PresetOutcome>> {
        let base_estimate = self.estimate(base)?;

        let outcomes = ScenarioKind::presets(base)
            .into_iter()
            .map(|kind| match self.compare(base, base_estimate.clone(), kind) {
                Ok(result) => PresetOutcome::Ok(result),
                Err(e) => {
                    log::debug!("Preset '{}' rejected: {}", kind.label(), e);
                    PresetOutcome::Rejected {
                        scenario: kind,
                        label: kind.label(),
                        error: e.to_string(),
                    }
                }
            })
            .collect();

        Ok(outcomes)
    }

    fn compare(&self, base: &RawInput, base_estimate: Estimate, kind: ScenarioKind) -> EngineResult<ScenarioResult> {
        let adjusted_input = kind.apply(base)?;
        let adjusted_estimate = self.estimate(&adjusted_input)?;

        let delta = adjusted_estimate.cost() - base_estimate.cost();
        let delta_pct = if base_estimate.cost() == 0.0 {
            None
        } else {
            Some(delta / base_estimate.cost() * 100.0)
        };

        Ok(ScenarioResult {
            label: kind.label(),
            scenario: kind,
            changed: adjusted_input != *base,
            base_estimate,
            adjusted_estimate,
            adjusted_input,
            delta,
            delta_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::error::EngineError;
    use crate::logic::features::{CategoryCodes, StandardScaler, FEATURE_COUNT};
    use crate::logic::input::{Region, Sex};
    use crate::logic::model::LinearModel;

    /// cost = 1000 + 100·age + 50·bmi + 10000·smoker + 500·region_code
    fn fixture(intercept: f64, coefficients: Vec<f64>) -> (FeatureEncoder, Estimator) {
        let encoder = FeatureEncoder::new(&CategoryCodes::ordinal(), StandardScaler::identity(FEATURE_COUNT)).unwrap();
        let estimator = Estimator::new(Box::new(LinearModel { coefficients, intercept }));
        (encoder, estimator)
    }

    fn simple() -> (FeatureEncoder, Estimator) {
        fixture(1000.0, vec![100.0, 0.0, 50.0, 0.0, 10000.0, 500.0])
    }

    fn base() -> RawInput {
        RawInput {
            age: 40,
            sex: Sex::Male,
            bmi: 30.0,
            children: 2,
            smoker: true,
            region: Region::Northwest,
        }
    }

    #[test]
    fn test_quit_smoking_delta() {
        let (enc, est) = simple();
        let result = ScenarioEngine::new(&enc, &est)
            .run_scenario(&base(), ScenarioKind::QuitSmoking)
            .unwrap();
        // base = 1000 + 4000 + 1500 + 10000 = 16500
        assert_eq!(result.base_estimate.cost(), 16500.0);
        assert_eq!(result.adjusted_estimate.cost(), 6500.0);
        assert_eq!(result.delta, -10000.0);
        assert!((result.delta_pct.unwrap() + 60.606).abs() < 0.01);
        assert!(result.changed);
        assert!(!result.adjusted_input.smoker);
    }

    #[test]
    fn test_quit_smoking_on_non_smoker_is_unchanged() {
        let (enc, est) = simple();
        let input = RawInput { smoker: false, ..base() };
        let result = ScenarioEngine::new(&enc, &est)
            .run_scenario(&input, ScenarioKind::QuitSmoking)
            .unwrap();
        assert!(!result.changed);
        assert_eq!(result.delta, 0.0);
    }

    #[test]
    fn test_target_bmi_out_of_domain() {
        let (enc, est) = simple();
        let err = ScenarioEngine::new(&enc, &est)
            .run_scenario(&base(), ScenarioKind::TargetBmi { value: 12.0 })
            .unwrap_err();
        match err {
            EngineError::Validation(v) => assert_eq!(v.field, "bmi"),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_change_region() {
        let (enc, est) = simple();
        let result = ScenarioEngine::new(&enc, &est)
            .run_scenario(&base(), ScenarioKind::ChangeRegion { region: Region::Southeast })
            .unwrap();
        assert_eq!(result.delta, 1500.0);
        assert_eq!(result.adjusted_input.region, Region::Southeast);
    }

    #[test]
    fn test_age_projection_rejected_past_upper_bound() {
        let (enc, est) = simple();
        let engine = ScenarioEngine::new(&enc, &est);
        let input = RawInput { age: 60, ..base() };

        assert!(engine.run_scenario(&input, ScenarioKind::AgeProjection { years: 4 }).is_ok());
        let err = engine
            .run_scenario(&input, ScenarioKind::AgeProjection { years: 5 })
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("65"));
    }

    #[test]
    fn test_age_projection_overflow_is_validation() {
        let (enc, est) = simple();
        let err = ScenarioEngine::new(&enc, &est)
            .run_scenario(&base(), ScenarioKind::AgeProjection { years: u32::MAX })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_zero_base_gives_undefined_pct() {
        let (enc, est) = fixture(0.0, vec![0.0; FEATURE_COUNT]);
        let result = ScenarioEngine::new(&enc, &est)
            .run_scenario(&base(), ScenarioKind::QuitSmoking)
            .unwrap();
        assert_eq!(result.base_estimate.cost(), 0.0);
        assert_eq!(result.delta_pct, None);
    }

    #[test]
    fn test_invalid_base_fails() {
        let (enc, est) = simple();
        let input = RawInput { age: 16, ..base() };
        assert!(ScenarioEngine::new(&enc, &est)
            .run_scenario(&input, ScenarioKind::QuitSmoking)
            .is_err());
    }

    #[test]
    fn test_presets_report_rejections_individually() {
        let (enc, est) = simple();
        let input = RawInput { age: 60, bmi: 17.0, ..base() };
        let outcomes = ScenarioEngine::new(&enc, &est).run_presets(&input).unwrap();
        assert_eq!(outcomes.len(), 4);

        // lose weight floors at the BMI minimum
        match &outcomes[1] {
            PresetOutcome::Ok(r) => assert_eq!(r.adjusted_input.bmi, 15.0),
            other => panic!("unexpected: {other:?}"),
        }
        // next region after northwest
        match &outcomes[2] {
            PresetOutcome::Ok(r) => assert_eq!(r.adjusted_input.region, Region::Northeast),
            other => panic!("unexpected: {other:?}"),
        }
        // 60 + 10 leaves the age domain
        assert!(matches!(outcomes[3], PresetOutcome::Rejected { .. }));
    }
}
