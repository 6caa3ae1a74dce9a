//! # models::judgment
//!
//! Defines [`Judgment`] — the classifier's verdict on a single article.
//!
//! Classifier output is untrusted: [`Judgment::new`] rejects non-finite
//! numbers and pins confidence into `[0, 1]`.  The raw score is kept as
//! reported; the aggregator clamps the composite.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

// ─── Label ────────────────────────────────────────────────────────────────────

/// The classifier's own directional label for one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Bullish,
    Neutral,
    Bearish,
}

impl FromStr for Label {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bullish" | "positive" => Ok(Label::Bullish),
            "neutral"              => Ok(Label::Neutral),
            "bearish" | "negative" => Ok(Label::Bearish),
            other => Err(ClassifyError::MalformedResponse(format!(
                "unknown sentiment label '{other}'"
            ))),
        }
    }
}

// ─── Judgment ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub label:      Label,
    /// Raw score, nominally `0..=100` (50 = neutral).
    pub score:      f64,
    /// Classifier certainty in `[0, 1]`.
    pub confidence: f64,
    /// Short free-text explanation, if the classifier gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason:     Option<String>,
}

impl Judgment {
    pub fn new(label: Label, score: f64, confidence: f64) -> Result<Self, ClassifyError> {
        if !score.is_finite() {
            return Err(ClassifyError::MalformedResponse(format!("non-finite score {score}")));
        }
        if !confidence.is_finite() {
            return Err(ClassifyError::MalformedResponse(format!(
                "non-finite confidence {confidence}"
            )));
        }

        Ok(Self {
            label,
            score,
            confidence: confidence.clamp(0.0, 1.0),
            reason: None,
        })
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        self.reason = (!reason.trim().is_empty()).then_some(reason);
        self
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!("BULLISH".parse::<Label>().unwrap(), Label::Bullish);
        assert_eq!(" neutral ".parse::<Label>().unwrap(), Label::Neutral);
        assert_eq!("Bearish".parse::<Label>().unwrap(), Label::Bearish);
    }

    #[test]
    fn test_unknown_label_is_malformed() {
        let err = "sideways".parse::<Label>().unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedResponse(_)));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let j = Judgment::new(Label::Bullish, 80.0, 1.7).unwrap();
        assert_eq!(j.confidence, 1.0);
        let j = Judgment::new(Label::Bearish, 20.0, -0.3).unwrap();
        assert_eq!(j.confidence, 0.0);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert!(Judgment::new(Label::Neutral, f64::NAN, 0.5).is_err());
        assert!(Judgment::new(Label::Neutral, 50.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_blank_reason_dropped() {
        let j = Judgment::new(Label::Neutral, 50.0, 0.5).unwrap().with_reason("   ");
        assert_eq!(j.reason, None);
    }
}
