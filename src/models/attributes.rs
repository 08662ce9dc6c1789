use crate::ml::features::CategoricalField;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Allowed previous-year ratings
pub const RATING_OPTIONS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

/// Department labels in form display order
pub const DEPARTMENT_OPTIONS: [&str; 9] = [
    "Sales & Marketing",
    "Operations",
    "Technology",
    "Analytics",
    "R&D",
    "Procurement",
    "Finance",
    "HR",
    "Legal",
];

pub const EDUCATION_OPTIONS: [&str; 4] = [
    "Below Secondary",
    "High School",
    "Bachelor's",
    "Master's & above",
];

pub const GENDER_OPTIONS: [&str; 2] = ["m", "f"];

pub const RECRUITMENT_OPTIONS: [&str; 3] = ["sourcing", "other", "referred"];

/// Options offered for a categorical field
pub fn options_for(field: CategoricalField) -> &'static [&'static str] {
    match field {
        CategoricalField::Department => &DEPARTMENT_OPTIONS,
        CategoricalField::Education => &EDUCATION_OPTIONS,
        CategoricalField::Gender => &GENDER_OPTIONS,
        CategoricalField::RecruitmentChannel => &RECRUITMENT_OPTIONS,
    }
}

/// Employee attributes as supplied by the form, one record per request.
///
/// Categorical values are checked against the encoders by the pipeline;
/// `validate()` covers the numeric ranges the form enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RawAttributes {
    #[validate(length(min = 1))]
    pub department: String,

    #[validate(length(min = 1))]
    pub education: String,

    #[validate(length(min = 1))]
    pub gender: String,

    #[validate(length(min = 1))]
    pub recruitment_channel: String,

    #[validate(range(min = 20, max = 60))]
    pub age: u32,

    #[validate(range(min = 40, max = 100))]
    pub avg_training_score: u32,

    #[validate(range(min = 1, max = 10))]
    pub no_of_trainings: u32,

    #[validate(custom(function = "validate_rating"))]
    pub previous_year_rating: f64,

    #[validate(range(min = 1, max = 40))]
    pub length_of_service: u32,

    /// KPIs met above 80%
    pub kpis_met: bool,

    pub awards_won: bool,
}

impl RawAttributes {
    /// Value of a categorical field
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Department => &self.department,
            CategoricalField::Education => &self.education,
            CategoricalField::Gender => &self.gender,
            CategoricalField::RecruitmentChannel => &self.recruitment_channel,
        }
    }
}

fn validate_rating(rating: f64) -> Result<(), ValidationError> {
    if RATING_OPTIONS.contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::new("rating_not_in_options"))
    }
}
