//! Gradient-boosted regression trees
//!
//! Same evaluation rule as scikit-learn's `GradientBoostingRegressor`:
//! `init + learning_rate * Σ tree(x)`, with `x[feature] <= threshold`
//! going left.

use serde::{Deserialize, Serialize};

use crate::logic::error::{EngineError, EngineResult};
use super::inference::Regressor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flat node list, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Children must point forward, which rules out cycles and makes every
    /// walk terminate.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {} of {}", idx, feature, n_features));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", idx, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} is not finite", idx));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub init: f64,
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> EngineResult<()> {
        if self.n_features == 0 {
            return Err(EngineError::Artifact("tree ensemble declares zero features".to_string()));
        }
        if !self.init.is_finite() || !self.learning_rate.is_finite() {
            return Err(EngineError::Artifact("tree ensemble has non-finite init/learning_rate".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| EngineError::Artifact(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> EngineResult<f64> {
        if row.len() != self.n_features {
            return Err(EngineError::ShapeMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        let boosted: f64 = self.trees.iter().map(|t| t.evaluate(row)).sum();
        Ok(self.init + self.learning_rate * boosted)
    }

    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::Split { feature, threshold, left: 1, right: 2 },
                TreeNode::Leaf { value: left },
                TreeNode::Leaf { value: right },
            ],
        }
    }

    #[test]
    fn test_predict_sums_trees() {
        let model = TreeEnsemble {
            n_features: 2,
            init: 100.0,
            learning_rate: 0.5,
            trees: vec![stump(0, 0.0, -10.0, 10.0), stump(1, 1.0, 4.0, 8.0)],
        };
        // left on tree 0 (x0 <= 0), right on tree 1 (x1 > 1)
        assert_eq!(model.predict(&[0.0, 2.0]).unwrap(), 100.0 + 0.5 * (-10.0 + 8.0));
    }

    #[test]
    fn test_threshold_goes_left_inclusive() {
        let tree = stump(0, 1.5, 1.0, 2.0);
        assert_eq!(tree.evaluate(&[1.5]), 1.0);
        assert_eq!(tree.evaluate(&[1.5000001]), 2.0);
    }

    #[test]
    fn test_backward_child_rejected() {
        let tree = RegressionTree {
            nodes: vec![
                TreeNode::Leaf { value: 1.0 },
                TreeNode::Split { feature: 0, threshold: 0.0, left: 0, right: 0 },
            ],
        };
        assert!(tree.validate(1).is_err());
    }

    #[test]
    fn test_feature_out_of_range_rejected() {
        let model = TreeEnsemble {
            n_features: 1,
            init: 0.0,
            learning_rate: 1.0,
            trees: vec![stump(3, 0.0, 1.0, 2.0)],
        };
        assert!(matches!(model.validate(), Err(EngineError::Artifact(_))));
    }

    #[test]
    fn test_serde_tagged_nodes() {
        let json = r#"{"nodes":[{"type":"split","feature":0,"threshold":0.5,"left":1,"right":2},{"type":"leaf","value":1.0},{"type":"leaf","value":2.0}]}"#;
        let tree: RegressionTree = serde_json::from_str(json).unwrap();
        assert!(tree.validate(1).is_ok());
        assert_eq!(tree.evaluate(&[0.7]), 2.0);
    }
}
