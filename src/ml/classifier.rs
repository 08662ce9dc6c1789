use crate::ml::error::{ArtifactLoadError, PredictionError, PredictionResult};
use crate::ml::features::{FeatureVector, FEATURE_NAMES, N_FEATURES};
use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

const MODEL_ARTIFACT: &str = "model";

/// Trait for pre-trained binary classifiers
pub trait BinaryClassifier: Send + Sync {
    /// Hard label: `true` for the positive class
    fn predict(&self, features: &FeatureVector) -> PredictionResult<bool>;

    /// Probability of the positive class
    fn predict_proba(&self, features: &FeatureVector) -> PredictionResult<f64>;

    /// Get model metadata
    fn metadata(&self) -> &ModelMetadata;

    /// Get model type
    fn model_type(&self) -> ModelType;
}

/// Supported model families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    LogisticRegression,
    DecisionTree,
}

/// Descriptive model information recorded at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            version: "0".to_string(),
            trained_at: None,
        }
    }
}

/// On-disk form of the classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,

    #[serde(default)]
    pub metadata: ModelMetadata,

    /// Training schema; must match `FEATURE_NAMES` exactly
    pub feature_names: Vec<String>,

    pub model: ModelParams,
}

/// Model parameters, tagged by model family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelParams {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    DecisionTree {
        nodes: Vec<TreeNode>,
    },
}

fn default_threshold() -> f64 {
    0.5
}

impl ModelArtifact {
    /// Check version and schema, then build the classifier
    pub fn into_classifier(self) -> Result<Box<dyn BinaryClassifier>, ArtifactLoadError> {
        if self.format_version != super::FORMAT_VERSION {
            return Err(ArtifactLoadError::incompatible(
                MODEL_ARTIFACT,
                format!(
                    "format version {} is not supported (expected {})",
                    self.format_version,
                    super::FORMAT_VERSION
                ),
            ));
        }

        if !self.feature_names.iter().map(String::as_str).eq(FEATURE_NAMES) {
            return Err(ArtifactLoadError::incompatible(
                MODEL_ARTIFACT,
                format!(
                    "feature schema {:?} does not match expected {:?}",
                    self.feature_names, FEATURE_NAMES
                ),
            ));
        }

        match self.model {
            ModelParams::LogisticRegression {
                coefficients,
                intercept,
                threshold,
            } => Ok(Box::new(LogisticRegressionClassifier::new(
                self.metadata,
                Array1::from_vec(coefficients),
                intercept,
                threshold,
            )?)),
            ModelParams::DecisionTree { nodes } => Ok(Box::new(DecisionTreeClassifier::new(
                self.metadata,
                nodes,
            )?)),
        }
    }
}

/// Logistic Regression Classifier
#[derive(Debug, Clone)]
pub struct LogisticRegressionClassifier {
    metadata: ModelMetadata,
    coefficients: Array1<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticRegressionClassifier {
    pub fn new(
        metadata: ModelMetadata,
        coefficients: Array1<f64>,
        intercept: f64,
        threshold: f64,
    ) -> Result<Self, ArtifactLoadError> {
        if coefficients.len() != N_FEATURES {
            return Err(ArtifactLoadError::incompatible(
                MODEL_ARTIFACT,
                format!(
                    "expected {} coefficients, found {}",
                    N_FEATURES,
                    coefficients.len()
                ),
            ));
        }
        if coefficients.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
            return Err(ArtifactLoadError::invalid(
                MODEL_ARTIFACT,
                "coefficients must be finite",
            ));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ArtifactLoadError::invalid(
                MODEL_ARTIFACT,
                format!("threshold {} outside (0, 1)", threshold),
            ));
        }

        Ok(Self {
            metadata,
            coefficients,
            intercept,
            threshold,
        })
    }

    fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.coefficients.dot(&features.to_ndarray()) + self.intercept
    }
}

impl BinaryClassifier for LogisticRegressionClassifier {
    fn predict(&self, features: &FeatureVector) -> PredictionResult<bool> {
        Ok(self.predict_proba(features)? >= self.threshold)
    }

    fn predict_proba(&self, features: &FeatureVector) -> PredictionResult<f64> {
        let z = self.decision_function(features);
        if !z.is_finite() {
            return Err(PredictionError::failed(format!(
                "decision function is not finite ({})",
                z
            )));
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn model_type(&self) -> ModelType {
        ModelType::LogisticRegression
    }
}

/// Node of a flattened decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Training class counts `[negative, positive]`
    Leaf { value: [f64; 2] },
}

/// Decision Tree Classifier
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    metadata: ModelMetadata,
    nodes: Vec<TreeNode>,
}

impl DecisionTreeClassifier {
    /// Children must point forward so every walk from the root terminates.
    pub fn new(metadata: ModelMetadata, nodes: Vec<TreeNode>) -> Result<Self, ArtifactLoadError> {
        if nodes.is_empty() {
            return Err(ArtifactLoadError::invalid(MODEL_ARTIFACT, "tree has no nodes"));
        }

        for (idx, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= N_FEATURES {
                        return Err(ArtifactLoadError::invalid(
                            MODEL_ARTIFACT,
                            format!("node {} splits on unknown feature {}", idx, feature),
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(ArtifactLoadError::invalid(
                            MODEL_ARTIFACT,
                            format!("node {} has a non-finite threshold", idx),
                        ));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= nodes.len() {
                            return Err(ArtifactLoadError::invalid(
                                MODEL_ARTIFACT,
                                format!("node {} has invalid child {}", idx, child),
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    let valid = value.iter().all(|v| v.is_finite() && *v >= 0.0)
                        && value[0] + value[1] > 0.0;
                    if !valid {
                        return Err(ArtifactLoadError::invalid(
                            MODEL_ARTIFACT,
                            format!("leaf {} has invalid class counts {:?}", idx, value),
                        ));
                    }
                }
            }
        }

        Ok(Self { metadata, nodes })
    }

    fn leaf_for(&self, features: &FeatureVector) -> PredictionResult<[f64; 2]> {
        let x = features.to_array();
        let mut idx = 0;

        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictionError::failed(format!(
                        "tree walk reached missing node {}",
                        idx
                    )))
                }
            }
        }
    }
}

impl BinaryClassifier for DecisionTreeClassifier {
    fn predict(&self, features: &FeatureVector) -> PredictionResult<bool> {
        let [negative, positive] = self.leaf_for(features)?;
        Ok(positive > negative)
    }

    fn predict_proba(&self, features: &FeatureVector) -> PredictionResult<f64> {
        let [negative, positive] = self.leaf_for(features)?;
        Ok(positive / (negative + positive))
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn model_type(&self) -> ModelType {
        ModelType::DecisionTree
    }
}
