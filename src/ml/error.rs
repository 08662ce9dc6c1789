//! Error types for artifact loading and prediction

use crate::error::AppError;
use crate::ml::features::CategoricalField;
use std::path::PathBuf;

/// Result type for prediction operations
pub type PredictionResult<T> = std::result::Result<T, PredictionError>;

/// Errors raised while loading the classifier and encoder artifacts.
///
/// Any of these leaves the store without a bundle; nothing is partially loaded.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    /// Artifact file does not exist
    #[error("Artifact '{artifact}' not found at {}", path.display())]
    Missing { artifact: String, path: PathBuf },

    /// Artifact file exists but could not be read
    #[error("Failed to read artifact '{artifact}' at {}: {source}", path.display())]
    Io {
        artifact: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact content is not a well-formed document
    #[error("Artifact '{artifact}' is corrupt: {message}")]
    Corrupt { artifact: String, message: String },

    /// Artifact was produced for a different format version or feature schema
    #[error("Artifact '{artifact}' is incompatible: {message}")]
    Incompatible { artifact: String, message: String },

    /// Artifact parsed but violates a structural invariant
    #[error("Artifact '{artifact}' is invalid: {message}")]
    Invalid { artifact: String, message: String },
}

impl ArtifactLoadError {
    /// Name of the artifact that failed to load
    pub fn artifact(&self) -> &str {
        match self {
            ArtifactLoadError::Missing { artifact, .. }
            | ArtifactLoadError::Io { artifact, .. }
            | ArtifactLoadError::Corrupt { artifact, .. }
            | ArtifactLoadError::Incompatible { artifact, .. }
            | ArtifactLoadError::Invalid { artifact, .. } => artifact,
        }
    }

    pub(crate) fn invalid(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        ArtifactLoadError::Invalid {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    pub(crate) fn incompatible(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        ArtifactLoadError::Incompatible {
            artifact: artifact.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by the inference pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    /// Categorical value outside the encoder's trained vocabulary
    #[error("Unknown {field} value '{value}'")]
    UnknownCategory {
        field: CategoricalField,
        value: String,
    },

    /// Any other failure during feature assembly or scoring
    #[error("Prediction failed: {message}")]
    Failed { message: String },
}

impl PredictionError {
    pub fn failed(message: impl Into<String>) -> Self {
        PredictionError::Failed {
            message: message.into(),
        }
    }
}

impl From<ArtifactLoadError> for AppError {
    fn from(err: ArtifactLoadError) -> Self {
        AppError::ArtifactLoad(err.to_string())
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::UnknownCategory { field, value } => AppError::UnknownCategory {
                field: field.to_string(),
                value,
            },
            PredictionError::Failed { message } => AppError::Prediction(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_message_names_field_and_value() {
        let err = PredictionError::UnknownCategory {
            field: CategoricalField::Department,
            value: "Catering".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown department value 'Catering'");
    }

    #[test]
    fn test_artifact_name_is_reported() {
        let err = ArtifactLoadError::Missing {
            artifact: "model".to_string(),
            path: PathBuf::from("/tmp/model.json"),
        };
        assert_eq!(err.artifact(), "model");
        assert!(err.to_string().contains("/tmp/model.json"));
    }

    #[test]
    fn test_conversion_into_app_error() {
        let err: AppError = PredictionError::UnknownCategory {
            field: CategoricalField::Gender,
            value: "x".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "UNKNOWN_CATEGORY");

        let err: AppError = PredictionError::failed("boom").into();
        assert_eq!(err.error_code(), "PREDICTION_ERROR");
    }
}
