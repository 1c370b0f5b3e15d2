//! Random forest classifier evaluated from an exported tree ensemble.
//!
//! Each tree is a flat node array rooted at index 0. Split nodes send a sample
//! left when `x[feature] <= threshold`; leaves carry per-class sample counts
//! `[down, up]`. The ensemble probability is the mean of the normalized leaf
//! distributions, the same rule the training library applies.

use super::predictor::BinaryClassifier;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on unknown feature {}", i, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    // Children always follow their parent in the exported layout
                    if *left <= i || *right <= i || *left >= self.nodes.len() || *right >= self.nodes.len() {
                        return Err(format!("node {} has invalid children ({}, {})", i, left, right));
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != 2 {
                        return Err(format!("leaf {} has {} class counts, expected 2", i, value.len()));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {} has invalid class counts", i));
                    }
                }
            }
        }
        Ok(())
    }

    /// Probability of the "up" class for one sample.
    fn leaf_probability(&self, x: &[f64]) -> Result<f64, String> {
        let mut index = 0;
        // Children are strictly after parents, so the walk is bounded by the node count
        for _ in 0..self.nodes.len() {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    return Ok(value[1] / total);
                }
            }
        }
        Err("tree walk did not reach a leaf".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForestClassifier {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> Result<Self, String> {
        let forest = Self { n_features, trees };
        forest.check()?;
        Ok(forest)
    }

    /// Structural checks run after deserialization.
    pub fn check(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl BinaryClassifier for ForestClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, String> {
        if self.trees.is_empty() {
            return Err("Model has no trees".to_string());
        }
        if features.len() != self.n_features {
            return Err(format!(
                "Model expects {} features, got {}",
                self.n_features,
                features.len()
            ));
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.leaf_probability(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn is_ready(&self) -> bool {
        !self.trees.is_empty()
    }

    fn name(&self) -> &str {
        "Random Forest"
    }
}
