//! # engine::assembler
//!
//! Packages a [`CompositeResult`] with the run metadata into the
//! [`SentimentReport`] handed to the sink.  Pure: no clock, no I/O, no ids
//! minted here.

use uuid::Uuid;

use crate::models::{ArticleOutcome, CompositeResult, SentimentReport};

/// Run-level parameters echoed into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchParams {
    pub run_id:        Uuid,
    pub lookback_days: u32,
    pub article_limit: u32,
}

pub fn assemble(
    params: BatchParams,
    composite: CompositeResult,
    articles: Vec<ArticleOutcome>,
) -> SentimentReport {
    SentimentReport {
        run_id: params.run_id,
        composite,
        lookback_days: params.lookback_days,
        article_limit: params.article_limit,
        articles,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregator::aggregate;
    use crate::models::{Judgment, Label, Outcome, OutcomeSet};

    fn make_params() -> BatchParams {
        BatchParams {
            run_id:        Uuid::nil(),
            lookback_days: 3,
            article_limit: 10,
        }
    }

    fn make_set() -> OutcomeSet {
        OutcomeSet {
            outcomes: vec![ArticleOutcome {
                article_id: "x1".into(),
                title:      "Apple Reports Record iPhone Sales".to_string(),
                outcome:    Outcome::Judged(
                    Judgment::new(Label::Bullish, 75.0, 0.8).unwrap().with_reason("beat estimates"),
                ),
            }],
            cancelled: false,
        }
    }

    #[test]
    fn test_field_layout_is_stable() {
        let set = make_set();
        let report = assemble(make_params(), aggregate("AAPL", &set), set.into_outcomes());
        let json = serde_json::to_value(&report).unwrap();

        for key in [
            "run_id",
            "instrument_id",
            "final_score",
            "bucket",
            "articles_attempted",
            "articles_succeeded",
            "articles_failed",
            "avg_confidence",
            "bucket_counts",
            "partial",
            "computed_at",
            "lookback_days",
            "article_limit",
            "articles",
        ] {
            assert!(json.get(key).is_some(), "missing field {key}");
        }

        assert_eq!(json["bucket"], "BULLISH_STRONG");
        assert_eq!(json["bucket_counts"]["bullish"], 1);
        assert_eq!(json["articles"][0]["status"], "JUDGED");
        assert_eq!(json["articles"][0]["label"], "BULLISH");
        assert_eq!(json["articles"][0]["reason"], "beat estimates");
    }

    #[test]
    fn test_no_data_serialises_null_score() {
        let empty = OutcomeSet { outcomes: vec![], cancelled: false };
        let report = assemble(make_params(), aggregate("AAPL", &empty), vec![]);
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["final_score"].is_null());
        assert!(json["avg_confidence"].is_null());
        assert_eq!(json["bucket"], "UNKNOWN");
    }
}
