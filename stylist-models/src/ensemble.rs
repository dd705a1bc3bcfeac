//! Gradient-boosted tree ensemble evaluation.
//!
//! Trees are stored as flat node arrays. A node with a `value` is a leaf;
//! otherwise it splits on `feature`, going `left` when the feature value is
//! `<= threshold`. Every tree adds its leaf value to the margin of its
//! `output` slot, starting from `base_score`.

use serde::{Deserialize, Serialize};
use stylist_core::constants::FEATURE_COUNT;
use stylist_core::errors::ModelError;

use crate::ModelResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<usize>,
    /// Leaf value (None for internal nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Node {
    pub fn leaf(value: f64) -> Self {
        Self {
            feature: None,
            threshold: None,
            left: None,
            right: None,
            value: Some(value),
        }
    }

    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self {
            feature: Some(feature),
            threshold: Some(threshold),
            left: Some(left),
            right: Some(right),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Output slot (class or target index) this tree contributes to.
    #[serde(default)]
    pub output: usize,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_outputs: usize,
    #[serde(default)]
    pub base_score: Vec<f64>,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Structural checks run once at load time.
    ///
    /// Children must come after their parent in the node array, which rules
    /// out cycles and bounds every walk by the tree size.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_outputs == 0 {
            return Err("n_outputs must be at least 1".to_string());
        }
        if !self.base_score.is_empty() && self.base_score.len() != self.n_outputs {
            return Err(format!(
                "base_score has {} entries, expected {}",
                self.base_score.len(),
                self.n_outputs
            ));
        }
        if self.base_score.iter().any(|b| !b.is_finite()) {
            return Err("base_score contains non-finite values".to_string());
        }
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.output >= self.n_outputs {
                return Err(format!(
                    "tree {t}: output {} out of range (n_outputs {})",
                    tree.output, self.n_outputs
                ));
            }
            if tree.nodes.is_empty() {
                return Err(format!("tree {t}: no nodes"));
            }
            let len = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                if let Some(value) = node.value {
                    if !value.is_finite() {
                        return Err(format!("tree {t} node {i}: non-finite leaf"));
                    }
                    continue;
                }
                let (Some(feature), Some(threshold), Some(left), Some(right)) =
                    (node.feature, node.threshold, node.left, node.right)
                else {
                    return Err(format!("tree {t} node {i}: incomplete split"));
                };
                if feature >= FEATURE_COUNT {
                    return Err(format!("tree {t} node {i}: feature {feature} out of range"));
                }
                if threshold.is_nan() {
                    return Err(format!("tree {t} node {i}: NaN threshold"));
                }
                for child in [left, right] {
                    if child <= i || child >= len {
                        return Err(format!("tree {t} node {i}: bad child index {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Raw per-output margins for one (already transformed) feature row.
    pub fn margins(&self, features: &[f64]) -> ModelResult<Vec<f64>> {
        let mut out = if self.base_score.is_empty() {
            vec![0.0; self.n_outputs]
        } else {
            self.base_score.clone()
        };
        for (t, tree) in self.trees.iter().enumerate() {
            let value = eval_tree(tree, features).ok_or_else(|| ModelError::InferenceFailed {
                reason: format!("tree {t} could not be evaluated"),
            })?;
            let slot = out
                .get_mut(tree.output)
                .ok_or_else(|| ModelError::InferenceFailed {
                    reason: format!("tree {t} output {} out of range", tree.output),
                })?;
            *slot += value;
        }
        if out.iter().any(|m| !m.is_finite()) {
            return Err(ModelError::InferenceFailed {
                reason: "non-finite margin".to_string(),
            });
        }
        Ok(out)
    }

    /// Class probabilities: softmax over margins, or a sigmoid pair for a
    /// single-output binary model.
    pub fn probabilities(&self, features: &[f64]) -> ModelResult<Vec<f64>> {
        let margins = self.margins(features)?;
        Ok(if margins.len() == 1 {
            let p = sigmoid(margins[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&margins)
        })
    }

    /// Number of classes the probability vector has.
    pub fn n_classes(&self) -> usize {
        if self.n_outputs == 1 {
            2
        } else {
            self.n_outputs
        }
    }
}

/// Walk one tree. `None` on a malformed node or a feature row too short.
fn eval_tree(tree: &Tree, features: &[f64]) -> Option<f64> {
    let mut idx = 0usize;
    for _ in 0..tree.nodes.len() {
        let node = tree.nodes.get(idx)?;
        if let Some(value) = node.value {
            return Some(value);
        }
        let x = *features.get(node.feature?)?;
        idx = if x <= node.threshold? {
            node.left?
        } else {
            node.right?
        };
    }
    None
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(margins: &[f64]) -> Vec<f64> {
    let max = margins.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = margins.iter().map(|m| (m - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(output: usize, feature: usize, threshold: f64, lo: f64, hi: f64) -> Tree {
        Tree {
            output,
            nodes: vec![
                Node::split(feature, threshold, 1, 2),
                Node::leaf(lo),
                Node::leaf(hi),
            ],
        }
    }

    fn row(slot: usize, value: f64) -> Vec<f64> {
        let mut r = vec![0.0; FEATURE_COUNT];
        r[slot] = value;
        r
    }

    #[test]
    fn split_goes_left_on_equal() {
        let model = TreeEnsemble {
            n_outputs: 1,
            base_score: vec![0.5],
            trees: vec![stump(0, 3, 50.0, 10.0, 20.0)],
        };
        model.validate().unwrap();
        assert_eq!(model.margins(&row(3, 30.0)).unwrap(), vec![10.5]);
        assert_eq!(model.margins(&row(3, 60.0)).unwrap(), vec![20.5]);
        assert_eq!(model.margins(&row(3, 50.0)).unwrap(), vec![10.5]);
    }

    #[test]
    fn trees_accumulate_per_output() {
        let model = TreeEnsemble {
            n_outputs: 2,
            base_score: vec![],
            trees: vec![
                stump(0, 0, 0.5, 1.0, 2.0),
                stump(0, 0, 0.5, 1.0, 2.0),
                stump(1, 0, 0.5, -1.0, 3.0),
            ],
        };
        assert_eq!(model.margins(&row(0, 1.0)).unwrap(), vec![4.0, 3.0]);
    }

    #[test]
    fn softmax_sums_to_one() {
        let model = TreeEnsemble {
            n_outputs: 3,
            base_score: vec![0.0, 1.0, 2.0],
            trees: vec![stump(0, 0, 0.5, 0.0, 0.0)],
        };
        let p = model.probabilities(&row(0, 0.0)).unwrap();
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn binary_model_yields_two_probabilities() {
        let model = TreeEnsemble {
            n_outputs: 1,
            base_score: vec![0.0],
            trees: vec![stump(0, 0, 0.5, -2.0, 2.0)],
        };
        let p = model.probabilities(&row(0, 1.0)).unwrap();
        assert_eq!(p.len(), 2);
        assert!(p[1] > 0.8);
        assert_eq!(model.n_classes(), 2);
    }

    #[test]
    fn backward_child_is_rejected() {
        let model = TreeEnsemble {
            n_outputs: 1,
            base_score: vec![],
            trees: vec![Tree {
                output: 0,
                nodes: vec![Node::split(0, 0.5, 0, 1), Node::leaf(1.0)],
            }],
        };
        assert!(model.validate().unwrap_err().contains("bad child index"));
    }

    #[test]
    fn out_of_range_feature_and_output_are_rejected() {
        let bad_feature = TreeEnsemble {
            n_outputs: 1,
            base_score: vec![],
            trees: vec![stump(0, FEATURE_COUNT, 0.5, 0.0, 1.0)],
        };
        assert!(bad_feature.validate().is_err());

        let bad_output = TreeEnsemble {
            n_outputs: 1,
            base_score: vec![],
            trees: vec![stump(1, 0, 0.5, 0.0, 1.0)],
        };
        assert!(bad_output.validate().is_err());
    }

    #[test]
    fn short_row_fails_inference() {
        let model = TreeEnsemble {
            n_outputs: 1,
            base_score: vec![],
            trees: vec![stump(0, 5, 0.5, 0.0, 1.0)],
        };
        assert!(matches!(
            model.margins(&[0.0; 3]),
            Err(ModelError::InferenceFailed { .. })
        ));
    }

    #[test]
    fn parses_sparse_node_json() {
        let json = r#"{
            "n_outputs": 1,
            "trees": [{"nodes": [
                {"feature": 2, "threshold": 0.5, "left": 1, "right": 2},
                {"value": -1.0},
                {"value": 1.0}
            ]}]
        }"#;
        let model: TreeEnsemble = serde_json::from_str(json).unwrap();
        model.validate().unwrap();
        assert_eq!(model.trees[0].output, 0);
        assert_eq!(model.margins(&row(2, 0.9)).unwrap(), vec![1.0]);
    }
}
