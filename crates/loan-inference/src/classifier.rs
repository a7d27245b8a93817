//! Binary classifiers that can score a feature vector.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A trained binary classifier.
///
/// Implementations are immutable once built and may be shared across
/// threads.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Short identifier of the estimator family.
    fn kind(&self) -> &'static str;

    /// Number of features the classifier consumes.
    fn width(&self) -> usize;

    /// Probability that `features` belong to the positive class.
    ///
    /// `features` has exactly [`width`](Self::width) values in schema order.
    fn positive_probability(&self, features: &[f64]) -> f64;
}

/// Logistic function.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Per-feature standardization applied before the linear term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Logistic regression: `sigmoid(intercept + Σ wᵢ·xᵢ)` on optionally
/// standardized inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    scaler: Option<StandardScaler>,
}

impl LogisticRegression {
    pub fn new(
        coefficients: Vec<f64>,
        intercept: f64,
        scaler: Option<StandardScaler>,
    ) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(ModelError::invalid("logistic regression has no coefficients"));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::invalid(
                "logistic regression weights must be finite",
            ));
        }
        if let Some(scaler) = &scaler {
            let width = coefficients.len();
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(ModelError::invalid(format!(
                    "scaler has {} means and {} scales for {} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    width
                )));
            }
            if let Some(idx) = scaler
                .scale
                .iter()
                .position(|s| *s == 0.0 || !s.is_finite())
            {
                return Err(ModelError::invalid(format!(
                    "scaler scale for feature {idx} must be finite and non-zero"
                )));
            }
            if scaler.mean.iter().any(|m| !m.is_finite()) {
                return Err(ModelError::invalid("scaler means must be finite"));
            }
        }
        Ok(Self {
            coefficients,
            intercept,
            scaler,
        })
    }

    /// Linear term before the logistic function.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        let linear: f64 = match &self.scaler {
            Some(scaler) => features
                .iter()
                .zip(&self.coefficients)
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|((x, w), (mean, scale))| w * (x - mean) / scale)
                .sum(),
            None => features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| w * x)
                .sum(),
        };
        self.intercept + linear
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn width(&self) -> usize {
        self.coefficients.len()
    }

    fn positive_probability(&self, features: &[f64]) -> f64 {
        sigmoid(self.decision_function(features))
    }
}

/// A node of a binary decision tree.
///
/// Splits send `x[feature] <= threshold` left and everything else right.
/// Leaves carry the positive-class probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
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

/// A single decision tree stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Checks node references and leaf values.
    ///
    /// Children must come after their parent, which rules out cycles.
    fn validate(&self, tree: usize, width: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ModelError::invalid(format!("tree {tree} has no nodes")));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= width {
                        return Err(ModelError::invalid(format!(
                            "tree {tree} node {idx} splits on feature {feature}, schema has {width}"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelError::invalid(format!(
                            "tree {tree} node {idx} has a NaN threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ModelError::invalid(format!(
                                "tree {tree} node {idx} points to invalid child {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(ModelError::invalid(format!(
                            "tree {tree} leaf {idx} has probability {value} outside [0, 1]"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

/// Soft-voting tree ensemble: the mean leaf probability across trees.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    trees: Vec<DecisionTree>,
    width: usize,
}

impl TreeEnsemble {
    pub fn new(trees: Vec<DecisionTree>, width: usize) -> Result<Self> {
        if trees.is_empty() {
            return Err(ModelError::invalid("tree ensemble has no trees"));
        }
        for (idx, tree) in trees.iter().enumerate() {
            tree.validate(idx, width)?;
        }
        Ok(Self { trees, width })
    }
}

impl Classifier for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }

    fn width(&self) -> usize {
        self.width
    }

    fn positive_probability(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.leaf_value(features)).sum();
        total / self.trees.len() as f64
    }
}
