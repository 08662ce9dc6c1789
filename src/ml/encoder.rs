use crate::ml::error::ArtifactLoadError;
use crate::ml::features::CategoricalField;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Label to integer mapping learned at training time
pub trait CategoricalEncoder: Send + Sync {
    /// Encode a label; `None` when the label was not seen during training
    fn transform(&self, label: &str) -> Option<i64>;

    /// Decode an integer code back to its label
    fn inverse_transform(&self, code: i64) -> Option<&str>;

    /// Labels known to the encoder
    fn vocabulary(&self) -> BTreeSet<&str>;
}

/// On-disk form of a label encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub format_version: u32,
    pub field: CategoricalField,
    pub classes: Vec<String>,
}

/// Label encoder where a label's code is its index in `classes`
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    field: CategoricalField,
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Build an encoder, rejecting anything that is not a bijection over a
    /// non-empty vocabulary.
    pub fn new(field: CategoricalField, classes: Vec<String>) -> Result<Self, ArtifactLoadError> {
        let artifact = artifact_name(field);

        if classes.is_empty() {
            return Err(ArtifactLoadError::invalid(artifact, "encoder has no classes"));
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (idx, label) in classes.iter().enumerate() {
            if label.is_empty() {
                return Err(ArtifactLoadError::invalid(
                    artifact,
                    format!("empty label at index {}", idx),
                ));
            }
            if codes.insert(label.clone(), idx as i64).is_some() {
                return Err(ArtifactLoadError::invalid(
                    artifact,
                    format!("duplicate label '{}'", label),
                ));
            }
        }

        Ok(Self {
            field,
            classes,
            codes,
        })
    }

    /// Validate a deserialized artifact destined for the `expected` slot
    pub fn from_artifact(
        artifact: EncoderArtifact,
        expected: CategoricalField,
    ) -> Result<Self, ArtifactLoadError> {
        let name = artifact_name(expected);

        if artifact.format_version != super::FORMAT_VERSION {
            return Err(ArtifactLoadError::incompatible(
                name,
                format!(
                    "format version {} is not supported (expected {})",
                    artifact.format_version,
                    super::FORMAT_VERSION
                ),
            ));
        }

        if artifact.field != expected {
            return Err(ArtifactLoadError::invalid(
                name,
                format!("file encodes '{}', not '{}'", artifact.field, expected),
            ));
        }

        Self::new(expected, artifact.classes)
    }

    pub fn field(&self) -> CategoricalField {
        self.field
    }

    /// Classes in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl CategoricalEncoder for LabelEncoder {
    fn transform(&self, label: &str) -> Option<i64> {
        self.codes.get(label).copied()
    }

    fn inverse_transform(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
    }

    fn vocabulary(&self) -> BTreeSet<&str> {
        self.classes.iter().map(String::as_str).collect()
    }
}

pub(crate) fn artifact_name(field: CategoricalField) -> String {
    format!("{}_encoder", field)
}
