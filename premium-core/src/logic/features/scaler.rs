//! Standard scaler
//!
//! Per-column `(x - mean) / scale`, parameters fixed at training time.

use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Identity transform over `width` columns
    pub fn identity(width: usize) -> Self {
        Self {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        }
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Reject parameters that would produce NaN/inf at request time
    pub fn validate(&self, expected_width: usize) -> EngineResult<()> {
        if self.mean.len() != expected_width || self.scale.len() != expected_width {
            return Err(EngineError::Artifact(format!(
                "scaler has {} means and {} scales, layout has {} features",
                self.mean.len(),
                self.scale.len(),
                expected_width
            )));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(EngineError::Artifact(format!("scaler mean[{}] is not finite", i)));
        }
        if let Some(i) = self.scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(EngineError::Artifact(format!("scaler scale[{}] must be finite and non-zero", i)));
        }
        Ok(())
    }

    pub fn transform(&self, raw: &[f64]) -> Vec<f64> {
        raw.iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }

    /// Fit on training rows (population std; constant columns get scale 1)
    pub fn fit(rows: &[Vec<f64>]) -> EngineResult<Self> {
        let width = rows.first().map(|r| r.len()).ok_or_else(|| {
            EngineError::Artifact("cannot fit scaler on zero rows".to_string())
        })?;
        if rows.iter().any(|r| r.len() != width) {
            return Err(EngineError::Artifact("ragged training rows".to_string()));
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x / n;
            }
        }

        let mut scale = vec![0.0; width];
        for row in rows {
            for ((s, x), m) in scale.iter_mut().zip(row).zip(&mean) {
                *s += (x - m).powi(2) / n;
            }
        }
        for s in scale.iter_mut() {
            *s = if *s > f64::EPSILON { s.sqrt() } else { 1.0 };
        }

        Ok(Self { mean, scale })
    }
}
