//! # engine::aggregator
//!
//! Reduces a closed [`OutcomeSet`] into one [`CompositeResult`].
//!
//! ```text
//! score          = Σ(score_i × confidence_i) / Σ(confidence_i)   → clamp [0, 100]
//! bucket         = Bucket::from_score(score)
//! avg_confidence = Σ(confidence_i) / n                            (unweighted)
//! bucket_counts  = tally of each judgment's own label
//! ```
//!
//! Failures only count towards `articles_failed`.  With zero successful
//! judgments the result is the "no data" variant: `final_score = null`,
//! `bucket = UNKNOWN`.  If every successful judgment reports zero confidence
//! the weights carry no information and the plain mean of scores is used.
//!
//! Outcomes are summed in input order, so the result is bit-for-bit the same
//! however the calls happened to complete.

use chrono::{DateTime, Utc};

use crate::models::{Bucket, BucketCounts, CompositeResult, Label, OutcomeSet};

pub fn aggregate(instrument_id: &str, outcomes: &OutcomeSet) -> CompositeResult {
    aggregate_at(instrument_id, outcomes, Utc::now())
}

pub fn aggregate_at(
    instrument_id: &str,
    outcomes: &OutcomeSet,
    computed_at: DateTime<Utc>,
) -> CompositeResult {
    let attempted = outcomes.len() as u32;

    let mut succeeded = 0u32;
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut plain_sum = 0.0;
    let mut counts = BucketCounts::default();

    for judgment in outcomes.judgments() {
        succeeded += 1;
        weighted_sum += judgment.score * judgment.confidence;
        weight_total += judgment.confidence;
        plain_sum += judgment.score;

        match judgment.label {
            Label::Bullish => counts.bullish += 1,
            Label::Neutral => counts.neutral += 1,
            Label::Bearish => counts.bearish += 1,
        }
    }

    let (final_score, avg_confidence) = if succeeded == 0 {
        (None, None)
    } else {
        let n = f64::from(succeeded);
        let raw = if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            plain_sum / n
        };
        (Some(raw.clamp(0.0, 100.0)), Some(weight_total / n))
    };

    CompositeResult {
        instrument_id: instrument_id.to_string(),
        final_score,
        bucket: Bucket::from_score(final_score),
        articles_attempted: attempted,
        articles_succeeded: succeeded,
        articles_failed: attempted - succeeded,
        avg_confidence,
        bucket_counts: counts,
        partial: outcomes.is_partial(),
        computed_at,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifyError;
    use crate::models::{ArticleOutcome, Failure, Judgment, Outcome};

    fn make_set(items: Vec<Outcome>, cancelled: bool) -> OutcomeSet {
        let outcomes = items
            .into_iter()
            .enumerate()
            .map(|(i, outcome)| ArticleOutcome {
                article_id: format!("n{i}").as_str().into(),
                title:      format!("headline {i}"),
                outcome,
            })
            .collect();
        OutcomeSet { outcomes, cancelled }
    }

    fn judged(label: Label, score: f64, confidence: f64) -> Outcome {
        Outcome::Judged(Judgment::new(label, score, confidence).unwrap())
    }

    fn failed() -> Outcome {
        Outcome::Failed(Failure::from_error(&ClassifyError::Timeout(std::time::Duration::from_secs(1)), 2))
    }

    #[test]
    fn test_confidence_weighting_favours_confident_judgment() {
        let set = make_set(
            vec![judged(Label::Bullish, 100.0, 0.9), judged(Label::Bearish, 0.0, 0.1)],
            false,
        );
        let result = aggregate("AAPL", &set);
        assert!((result.final_score.unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(result.bucket, Bucket::BullishStrong);
    }

    #[test]
    fn test_failures_only_count_towards_failed() {
        let set = make_set(
            vec![
                judged(Label::Bullish, 80.0, 0.9),
                judged(Label::Neutral, 50.0, 0.5),
                failed(),
            ],
            false,
        );
        let result = aggregate("NVDA", &set);

        assert_eq!(result.articles_attempted, 3);
        assert_eq!(result.articles_succeeded, 2);
        assert_eq!(result.articles_failed, 1);
        let expected = (80.0 * 0.9 + 50.0 * 0.5) / (0.9 + 0.5);
        assert!((result.final_score.unwrap() - expected).abs() < 1e-9);
        assert_eq!(result.bucket, Bucket::BullishWeak);
        assert!((result.avg_confidence.unwrap() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_all_failed_is_no_data() {
        let set = make_set(vec![failed(), failed()], false);
        let result = aggregate("MSFT", &set);

        assert!(result.is_no_data());
        assert_eq!(result.bucket, Bucket::Unknown);
        assert_eq!(result.avg_confidence, None);
        assert_eq!(result.articles_failed, 2);
        assert_eq!(result.articles_succeeded + result.articles_failed, result.articles_attempted);
    }

    #[test]
    fn test_empty_batch_is_no_data() {
        let result = aggregate("AMD", &make_set(vec![], false));
        assert!(result.is_no_data());
        assert_eq!(result.articles_attempted, 0);
        assert_eq!(result.bucket_counts, BucketCounts::default());
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let set = make_set(vec![judged(Label::Bullish, 140.0, 1.0)], false);
        assert_eq!(aggregate("TSLA", &set).final_score, Some(100.0));

        let set = make_set(vec![judged(Label::Bearish, -25.0, 0.8)], false);
        assert_eq!(aggregate("TSLA", &set).final_score, Some(0.0));
    }

    #[test]
    fn test_zero_confidence_falls_back_to_plain_mean() {
        let set = make_set(
            vec![judged(Label::Bullish, 70.0, 0.0), judged(Label::Neutral, 50.0, 0.0)],
            false,
        );
        let result = aggregate("INTC", &set);
        assert_eq!(result.final_score, Some(60.0));
        assert_eq!(result.avg_confidence, Some(0.0));
    }

    #[test]
    fn test_label_counts_may_disagree_with_bucket() {
        // Two mildly bullish labels, one very confident bearish call.
        let set = make_set(
            vec![
                judged(Label::Bullish, 62.0, 0.2),
                judged(Label::Bullish, 65.0, 0.2),
                judged(Label::Bearish, 10.0, 0.95),
            ],
            false,
        );
        let result = aggregate("META", &set);
        assert_eq!(result.bucket_counts, BucketCounts { bullish: 2, neutral: 0, bearish: 1 });
        assert_eq!(result.bucket, Bucket::BearishStrong);
    }

    #[test]
    fn test_partial_flag_carried_through() {
        let set = make_set(vec![judged(Label::Neutral, 50.0, 0.6), failed()], true);
        let result = aggregate("CRM", &set);
        assert!(result.partial);
        assert_eq!(result.final_score, Some(50.0));
    }

    #[test]
    fn test_computed_at_is_caller_supplied() {
        let at = chrono::DateTime::parse_from_rfc3339("2026-02-05T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = aggregate_at("AAPL", &make_set(vec![], false), at);
        assert_eq!(result.computed_at, at);
    }
}
