//! # models::result
//!
//! Defines [`CompositeResult`] — the aggregated sentiment for one batch — and
//! [`SentimentReport`], the format-stable record handed to the report sink.
//!
//! ## Score → Bucket
//! ```text
//! [70, 100]  BULLISH_STRONG
//! [60, 70)   BULLISH_WEAK
//! [41, 60)   NEUTRAL
//! [31, 41)   BEARISH_WEAK
//! [0, 31)    BEARISH_STRONG
//! null       UNKNOWN
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ArticleOutcome;

// ─── Bucket ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bucket {
    BullishStrong,
    BullishWeak,
    Neutral,
    BearishWeak,
    BearishStrong,
    /// No successful judgment — there is no score to bucket.
    Unknown,
}

impl Bucket {
    pub const BULLISH_STRONG_MIN: f64 = 70.0;
    pub const BULLISH_WEAK_MIN:   f64 = 60.0;
    pub const NEUTRAL_MIN:        f64 = 41.0;
    pub const BEARISH_WEAK_MIN:   f64 = 31.0;

    /// Lower bound inclusive, upper bound exclusive.  Scores are expected to be
    /// clamped to `[0, 100]` already; anything above 70 lands in the top bucket
    /// and anything below 31 in the bottom one.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => Bucket::Unknown,
            Some(s) if s >= Self::BULLISH_STRONG_MIN => Bucket::BullishStrong,
            Some(s) if s >= Self::BULLISH_WEAK_MIN => Bucket::BullishWeak,
            Some(s) if s >= Self::NEUTRAL_MIN => Bucket::Neutral,
            Some(s) if s >= Self::BEARISH_WEAK_MIN => Bucket::BearishWeak,
            Some(_) => Bucket::BearishStrong,
        }
    }
}

// ─── BucketCounts ─────────────────────────────────────────────────────────────

/// How many successful judgments carried each *label*.  Independent of the
/// composite bucket; the two may disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub bullish: u32,
    pub neutral: u32,
    pub bearish: u32,
}

// ─── CompositeResult ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub instrument_id:      String,
    /// Confidence-weighted mean in `[0, 100]`; `null` when nothing succeeded.
    pub final_score:        Option<f64>,
    pub bucket:             Bucket,
    pub articles_attempted: u32,
    pub articles_succeeded: u32,
    pub articles_failed:    u32,
    /// Unweighted mean confidence of successful judgments; `null` when none.
    pub avg_confidence:     Option<f64>,
    pub bucket_counts:      BucketCounts,
    /// The batch was cancelled or timed out before every call finished.
    pub partial:            bool,
    pub computed_at:        DateTime<Utc>,
}

impl CompositeResult {
    /// `true` for the distinct "no data" variant.
    pub fn is_no_data(&self) -> bool {
        self.final_score.is_none()
    }
}

// ─── SentimentReport ──────────────────────────────────────────────────────────

/// The final record for one instrument run.  Field layout is stable: the JSON
/// written by the sink is consumed by downstream tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub run_id:        Uuid,
    #[serde(flatten)]
    pub composite:     CompositeResult,
    pub lookback_days: u32,
    pub article_limit: u32,
    /// Per-article outcomes in the order the news source returned them.
    pub articles:      Vec<ArticleOutcome>,
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (70.0, Bucket::BullishStrong),
            (69.999, Bucket::BullishWeak),
            (60.0, Bucket::BullishWeak),
            (59.999, Bucket::Neutral),
            (41.0, Bucket::Neutral),
            (40.999, Bucket::BearishWeak),
            (31.0, Bucket::BearishWeak),
            (30.999, Bucket::BearishStrong),
            (0.0, Bucket::BearishStrong),
            (100.0, Bucket::BullishStrong),
        ];
        for (score, expected) in cases {
            assert_eq!(Bucket::from_score(Some(score)), expected, "score {score}");
        }
    }

    #[test]
    fn test_missing_score_is_unknown() {
        assert_eq!(Bucket::from_score(None), Bucket::Unknown);
    }

    #[test]
    fn test_bucket_serialises_screaming_snake() {
        assert_eq!(serde_json::to_string(&Bucket::BullishWeak).unwrap(), r#""BULLISH_WEAK""#);
        assert_eq!(serde_json::to_string(&Bucket::Unknown).unwrap(), r#""UNKNOWN""#);
    }
}
