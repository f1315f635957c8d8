//! Inference Engine - frozen regressor behind a shape-checked estimator
//!
//! The regressor is opaque (`Regressor` trait); the `Estimator` owns the
//! contract around it: explicit shape check, clamping, error mapping and
//! latency counters.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};
use crate::logic::features::FeatureVector;

// ============================================================================
// REGRESSOR TRAIT
// ============================================================================

/// Anything that maps a fixed-width row to one number
pub trait Regressor: Send + Sync {
    /// Input width the model was trained on
    fn n_features(&self) -> usize;

    fn predict(&self, row: &[f64]) -> EngineResult<f64>;

    /// Additive per-feature contributions, when the model has them
    fn breakdown(&self, _row: &[f64]) -> Option<BTreeMap<String, f64>> {
        None
    }

    fn kind(&self) -> &'static str;
}

// ============================================================================
// ESTIMATE
// ============================================================================

/// Annual premium estimate. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    cost: f64,
    clamped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<BTreeMap<String, f64>>,
}

impl Estimate {
    /// Negative outputs clamp to zero; non-finite outputs are an error
    pub fn from_model_output(raw: f64, breakdown: Option<BTreeMap<String, f64>>) -> EngineResult<Self> {
        if !raw.is_finite() {
            return Err(EngineError::Estimation(format!("model returned {}", raw)));
        }
        Ok(Self {
            cost: raw.max(0.0),
            clamped: raw < 0.0,
            breakdown,
        })
    }

    /// Annual cost
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn monthly(&self) -> f64 {
        self.cost / 12.0
    }

    pub fn weekly(&self) -> f64 {
        self.cost / 52.0
    }

    /// True when the model produced a negative value
    pub fn clamped(&self) -> bool {
        self.clamped
    }

    pub fn breakdown(&self) -> Option<&BTreeMap<String, f64>> {
        self.breakdown.as_ref()
    }
}

// ============================================================================
// STATUS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorStatus {
    pub model_kind: String,
    pub expected_features: usize,
    pub estimate_count: u64,
    pub avg_latency_ms: f64,
}

// ============================================================================
// ESTIMATOR
// ============================================================================

pub struct Estimator {
    model: Box<dyn Regressor>,
    latency_sum_us: AtomicU64,
    estimate_count: AtomicU64,
}

impl std::fmt::Debug for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("kind", &self.model.kind())
            .field("n_features", &self.model.n_features())
            .finish()
    }
}

impl Estimator {
    pub fn new(model: Box<dyn Regressor>) -> Self {
        Self {
            model,
            latency_sum_us: AtomicU64::new(0),
            estimate_count: AtomicU64::new(0),
        }
    }

    pub fn expected_width(&self) -> usize {
        self.model.n_features()
    }

    pub fn model_kind(&self) -> &'static str {
        self.model.kind()
    }

    pub fn estimate(&self, vector: &FeatureVector) -> EngineResult<Estimate> {
        vector.validate()?;

        let expected = self.model.n_features();
        if vector.len() != expected {
            return Err(EngineError::ShapeMismatch {
                expected,
                actual: vector.len(),
            });
        }

        let start = Instant::now();
        let raw = self.model.predict(vector.as_slice())?;
        let breakdown = self.model.breakdown(vector.as_slice());
        let elapsed = start.elapsed().as_micros() as u64;

        self.latency_sum_us.fetch_add(elapsed, Ordering::Relaxed);
        self.estimate_count.fetch_add(1, Ordering::Relaxed);

        log::trace!("{} estimate {:.2} for {}", self.model.kind(), raw, vector.to_log_entry());

        let estimate = Estimate::from_model_output(raw, breakdown)?;
        if estimate.clamped() {
            log::warn!("{} model returned negative premium {:.2}, clamped to 0", self.model.kind(), raw);
        }
        Ok(estimate)
    }

    pub fn status(&self) -> EstimatorStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.estimate_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        EstimatorStatus {
            model_kind: self.model.kind().to_string(),
            expected_features: self.model.n_features(),
            estimate_count: count,
            avg_latency_ms: avg,
        }
    }
}
