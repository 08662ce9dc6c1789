use ndarray::Array1;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Number of features the classifier was trained on
pub const N_FEATURES: usize = 11;

/// Column names of the training schema, in classifier order.
///
/// The classifier has no schema validation of its own: a reordering here
/// produces wrong predictions rather than an error.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "department_encoded",
    "education_encoded",
    "gender_encoded",
    "recruitment_channel_encoded",
    "no_of_trainings",
    "age",
    "previous_year_rating",
    "length_of_service",
    "kpis_met",
    "awards_won",
    "avg_training_score",
];

/// Categorical attributes that go through a label encoder
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoricalField {
    Department,
    Education,
    Gender,
    RecruitmentChannel,
}

/// Fixed-schema numeric record consumed by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub department_encoded: i64,
    pub education_encoded: i64,
    pub gender_encoded: i64,
    pub recruitment_channel_encoded: i64,
    pub no_of_trainings: u32,
    pub age: u32,
    pub previous_year_rating: f64,
    pub length_of_service: u32,
    pub kpis_met: u8,
    pub awards_won: u8,
    pub avg_training_score: u32,
}

impl FeatureVector {
    /// Values in `FEATURE_NAMES` order
    pub fn to_array(&self) -> [f64; N_FEATURES] {
        [
            self.department_encoded as f64,
            self.education_encoded as f64,
            self.gender_encoded as f64,
            self.recruitment_channel_encoded as f64,
            f64::from(self.no_of_trainings),
            f64::from(self.age),
            self.previous_year_rating,
            f64::from(self.length_of_service),
            f64::from(self.kpis_met),
            f64::from(self.awards_won),
            f64::from(self.avg_training_score),
        ]
    }

    pub fn to_ndarray(&self) -> Array1<f64> {
        Array1::from_vec(self.to_array().to_vec())
    }

    /// Named view, mostly for diagnostics
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES.iter().copied().zip(self.to_array()).collect()
    }

    /// Name of the first non-finite feature, if any
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.named()
            .into_iter()
            .find(|(_, value)| !value.is_finite())
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn sample() -> FeatureVector {
        FeatureVector {
            department_encoded: 8,
            education_encoded: 0,
            gender_encoded: 1,
            recruitment_channel_encoded: 2,
            no_of_trainings: 1,
            age: 30,
            previous_year_rating: 3.0,
            length_of_service: 5,
            kpis_met: 0,
            awards_won: 1,
            avg_training_score: 75,
        }
    }

    #[test]
    fn test_array_follows_feature_names() {
        let named = sample().named();
        assert_eq!(named.len(), N_FEATURES);
        assert_eq!(named[0], ("department_encoded", 8.0));
        assert_eq!(named[4], ("no_of_trainings", 1.0));
        assert_eq!(named[5], ("age", 30.0));
        assert_eq!(named[9], ("awards_won", 1.0));
        assert_eq!(named[10], ("avg_training_score", 75.0));
    }

    #[test]
    fn test_non_finite_detection() {
        let mut vector = sample();
        assert_eq!(vector.first_non_finite(), None);

        vector.previous_year_rating = f64::NAN;
        assert_eq!(vector.first_non_finite(), Some("previous_year_rating"));
    }

    #[test]
    fn test_field_names() {
        let names: Vec<String> = CategoricalField::iter().map(|f| f.to_string()).collect();
        assert_eq!(
            names,
            vec!["department", "education", "gender", "recruitment_channel"]
        );
    }
}
