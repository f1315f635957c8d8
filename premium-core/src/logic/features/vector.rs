//! Feature Vector - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! Values are kept in a `Vec` rather than a fixed array: the model artifact,
//! not this crate, decides the expected width, and a mismatch has to be
//! observable so the estimator can reject it.

use serde::{Deserialize, Serialize};
use super::layout::{
    FEATURE_VERSION, FEATURE_LAYOUT,
    layout_hash, validate_layout, LayoutMismatchError,
};

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create from values in current layout order
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    pub fn is_compatible(&self) -> bool {
        self.validate().is_ok()
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::FEATURE_COUNT;

    #[test]
    fn test_from_values_keeps_width() {
        let short = FeatureVector::from_values(vec![1.0, 2.0]);
        assert_eq!(short.len(), 2);
        assert!(short.is_compatible());
    }

    #[test]
    fn test_get_by_name() {
        let v = FeatureVector::from_values((0..FEATURE_COUNT).map(|i| i as f64).collect());
        assert_eq!(v.get_by_name("bmi"), Some(2.0));
        assert_eq!(v.get_by_name("unknown"), None);
    }

    #[test]
    fn test_stale_version_detected() {
        let mut v = FeatureVector::from_values(vec![0.0; FEATURE_COUNT]);
        v.version = FEATURE_VERSION + 1;
        assert!(!v.is_compatible());
    }

    #[test]
    fn test_log_entry_has_names() {
        let v = FeatureVector::from_values(vec![0.5; FEATURE_COUNT]);
        let entry = v.to_log_entry();
        assert_eq!(entry["named_values"]["smoker"], 0.5);
        assert_eq!(entry["feature_version"], FEATURE_VERSION);
    }
}
