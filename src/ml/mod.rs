/// Inference core: artifact loading, categorical encoding and classification
///
/// This module provides:
/// - Label encoders for the four categorical attributes
/// - Binary classifiers (Logistic Regression, Decision Tree) read from JSON artifacts
/// - A load-once artifact store
/// - The encode-predict-decode pipeline

pub mod classifier;
pub mod encoder;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod store;

/// Artifact format version understood by this build
pub const FORMAT_VERSION: u32 = 1;

pub use classifier::{
    BinaryClassifier, DecisionTreeClassifier, LogisticRegressionClassifier, ModelArtifact,
    ModelMetadata, ModelType,
};
pub use encoder::{CategoricalEncoder, EncoderArtifact, LabelEncoder};
pub use error::{ArtifactLoadError, PredictionError, PredictionResult};
pub use features::{CategoricalField, FeatureVector, FEATURE_NAMES, N_FEATURES};
pub use pipeline::{encode, predict, EncodingEntry, InferencePipeline};
pub use store::{ArtifactBundle, ArtifactPaths, ArtifactStore, EncoderSet};
