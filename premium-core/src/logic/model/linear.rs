//! Linear regressor: `intercept + Σ coef[i] * x[i]`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};
use crate::logic::features::feature_name;
use super::inference::Regressor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn validate(&self) -> EngineResult<()> {
        if self.coefficients.is_empty() {
            return Err(EngineError::Artifact("linear model has no coefficients".to_string()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(EngineError::Artifact("linear model has non-finite parameters".to_string()));
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, row: &[f64]) -> EngineResult<f64> {
        let dot: f64 = self.coefficients.iter().zip(row).map(|(c, x)| c * x).sum();
        Ok(self.intercept + dot)
    }

    fn breakdown(&self, row: &[f64]) -> Option<BTreeMap<String, f64>> {
        let mut parts: BTreeMap<String, f64> = self.coefficients
            .iter()
            .zip(row)
            .enumerate()
            .map(|(i, (c, x))| {
                let name = feature_name(i).map(str::to_string).unwrap_or_else(|| format!("feature_{}", i));
                (name, c * x)
            })
            .collect();
        parts.insert("intercept".to_string(), self.intercept);
        Some(parts)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict() {
        let model = LinearModel { coefficients: vec![2.0, -1.0], intercept: 10.0 };
        assert_eq!(model.predict(&[3.0, 4.0]).unwrap(), 12.0);
    }

    #[test]
    fn test_breakdown_names_follow_layout() {
        let model = LinearModel { coefficients: vec![1.0; 6], intercept: 0.0 };
        let parts = model.breakdown(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(parts["smoker"], 5.0);
        assert_eq!(parts["intercept"], 0.0);
        assert_eq!(parts.len(), 7);
    }

    #[test]
    fn test_validate() {
        assert!(LinearModel { coefficients: vec![], intercept: 0.0 }.validate().is_err());
        assert!(LinearModel { coefficients: vec![f64::NAN], intercept: 0.0 }.validate().is_err());
        assert!(LinearModel { coefficients: vec![1.0], intercept: 0.0 }.validate().is_ok());
    }
}
