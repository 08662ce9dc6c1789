use crate::ml::error::{PredictionError, PredictionResult};
use crate::ml::features::{CategoricalField, FeatureVector};
use crate::ml::store::ArtifactBundle;
use crate::models::{options_for, RawAttributes, Verdict};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Encode-predict-decode over a loaded artifact bundle.
///
/// Stateless apart from the shared bundle: identical inputs give identical verdicts.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    bundle: Arc<ArtifactBundle>,
}

impl InferencePipeline {
    pub fn new(bundle: Arc<ArtifactBundle>) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Build the classifier input for one record
    pub fn encode(&self, raw: &RawAttributes) -> PredictionResult<FeatureVector> {
        encode(raw, &self.bundle)
    }

    /// Score one record
    pub fn predict(&self, raw: &RawAttributes) -> PredictionResult<Verdict> {
        predict(raw, &self.bundle)
    }

    /// Label to code table for a field, in form display order
    pub fn encodings(&self, field: CategoricalField) -> Vec<EncodingEntry> {
        let encoder = self.bundle.encoders().get(field);
        options_for(field)
            .iter()
            .map(|label| EncodingEntry {
                label: label.to_string(),
                code: encoder.transform(label),
            })
            .collect()
    }
}

/// One row of an encoding table; `code` is `None` for labels the encoder never saw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingEntry {
    pub label: String,
    pub code: Option<i64>,
}

/// Score one record against `bundle`
pub fn predict(raw: &RawAttributes, bundle: &ArtifactBundle) -> PredictionResult<Verdict> {
    let features = encode(raw, bundle)?;

    if let Some(name) = features.first_non_finite() {
        return Err(PredictionError::failed(format!(
            "feature '{}' is not a finite number",
            name
        )));
    }

    let classifier = bundle.classifier();
    let promoted = classifier.predict(&features)?;
    let probability = classifier.predict_proba(&features)?;

    if !(0.0..=1.0).contains(&probability) {
        return Err(PredictionError::failed(format!(
            "classifier returned probability {} outside [0, 1]",
            probability
        )));
    }

    Ok(Verdict::from_scores(promoted, probability))
}

/// Look up the categorical codes and assemble the feature vector
pub fn encode(raw: &RawAttributes, bundle: &ArtifactBundle) -> PredictionResult<FeatureVector> {
    let code = |field: CategoricalField| -> PredictionResult<i64> {
        let value = raw.categorical(field);
        bundle
            .encoders()
            .get(field)
            .transform(value)
            .ok_or_else(|| PredictionError::UnknownCategory {
                field,
                value: value.to_string(),
            })
    };

    Ok(FeatureVector {
        department_encoded: code(CategoricalField::Department)?,
        education_encoded: code(CategoricalField::Education)?,
        gender_encoded: code(CategoricalField::Gender)?,
        recruitment_channel_encoded: code(CategoricalField::RecruitmentChannel)?,
        no_of_trainings: raw.no_of_trainings,
        age: raw.age,
        previous_year_rating: raw.previous_year_rating,
        length_of_service: raw.length_of_service,
        kpis_met: u8::from(raw.kpis_met),
        awards_won: u8::from(raw.awards_won),
        avg_training_score: raw.avg_training_score,
    })
}
