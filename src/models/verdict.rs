use serde::{Deserialize, Serialize};

/// Outcome of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub promoted: bool,

    /// Confidence in the reported outcome (0.0 - 1.0)
    pub confidence: f64,
}

impl Verdict {
    /// Derive the verdict from the hard label and the positive-class probability
    pub fn from_scores(promoted: bool, probability_positive: f64) -> Self {
        let confidence = if promoted {
            probability_positive
        } else {
            1.0 - probability_positive
        };
        Self {
            promoted,
            confidence,
        }
    }

    /// Confidence as a percentage with one decimal, e.g. `87.3%`
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    pub fn headline(&self) -> String {
        if self.promoted {
            format!(
                "Promotion Recommended! (Confidence: {})",
                self.confidence_percent()
            )
        } else {
            format!(
                "Promotion Not Recommended (Confidence: {})",
                self.confidence_percent()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_follows_outcome() {
        let promoted = Verdict::from_scores(true, 0.8);
        assert!(promoted.promoted);
        assert!((promoted.confidence - 0.8).abs() < 1e-12);

        let rejected = Verdict::from_scores(false, 0.2);
        assert!(!rejected.promoted);
        assert!((rejected.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_headline() {
        let verdict = Verdict {
            promoted: true,
            confidence: 0.8734,
        };
        assert_eq!(verdict.confidence_percent(), "87.3%");
        assert_eq!(
            verdict.headline(),
            "Promotion Recommended! (Confidence: 87.3%)"
        );

        let verdict = Verdict {
            promoted: false,
            confidence: 0.5,
        };
        assert_eq!(
            verdict.headline(),
            "Promotion Not Recommended (Confidence: 50.0%)"
        );
    }
}
