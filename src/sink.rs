//! # sink — Report output
//!
//! Writes a [`SentimentReport`] as pretty JSON and logs a human-readable
//! summary through `tracing`.  Multi-ticker runs also get a ranking table.
//! The engine never calls this; the binary does.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::models::{Bucket, Outcome, SentimentReport};

/// `<TICKER>_<YYYYmmdd_HHMMSS>.json`, timestamped by `computed_at`.
pub fn report_file_name(report: &SentimentReport) -> String {
    format!(
        "{}_{}.json",
        report.composite.instrument_id,
        report.composite.computed_at.format("%Y%m%d_%H%M%S")
    )
}

/// Write `report` into `dir` (created if missing) and return the file path.
pub async fn write_json(dir: &Path, report: &SentimentReport) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output dir {}", dir.display()))?;

    let path = dir.join(report_file_name(report));
    let body = serde_json::to_vec_pretty(report).context("Failed to serialise report")?;

    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "📝 Report written");
    Ok(path)
}

/// One summary line plus one line per article.
pub fn log_summary(report: &SentimentReport) {
    let c = &report.composite;
    let score = fmt_score(c.final_score);
    let confidence = fmt_confidence(c.avg_confidence);

    info!(
        ticker     = %c.instrument_id,
        score      = %score,
        bucket     = ?c.bucket,
        articles   = c.articles_attempted,
        succeeded  = c.articles_succeeded,
        failed     = c.articles_failed,
        confidence = %confidence,
        bullish    = c.bucket_counts.bullish,
        neutral    = c.bucket_counts.neutral,
        bearish    = c.bucket_counts.bearish,
        partial    = c.partial,
        "📊 Sentiment result"
    );

    for (i, article) in report.articles.iter().enumerate() {
        let title: String = article.title.chars().take(60).collect();
        match &article.outcome {
            Outcome::Judged(j) => info!(
                n          = i + 1,
                label      = ?j.label,
                score      = j.score,
                confidence = j.confidence,
                reason     = j.reason.as_deref().unwrap_or("-"),
                "{title}"
            ),
            Outcome::Failed(f) => info!(
                n        = i + 1,
                kind     = ?f.kind,
                attempts = f.attempts,
                error    = %f.message,
                "{title}"
            ),
        }
    }
}

// ─── Multi-Ticker Ranking ─────────────────────────────────────────────────────

/// Cross-ticker view of one run.
#[derive(Debug)]
pub struct Ranking<'a> {
    /// Highest score first; tickers without a score go last.
    pub ranked:        Vec<&'a SentimentReport>,
    pub bullish:       Vec<&'a str>,
    pub bearish:       Vec<&'a str>,
    /// Mean of the tickers that produced a score.
    pub average_score: Option<f64>,
}

pub fn rank(reports: &[SentimentReport]) -> Ranking<'_> {
    let mut ranked: Vec<&SentimentReport> = reports.iter().collect();
    ranked.sort_by(|a, b| {
        match (a.composite.final_score, b.composite.final_score) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.composite.instrument_id.cmp(&b.composite.instrument_id))
    });

    let bullish = tickers_where(&ranked, |b| matches!(b, Bucket::BullishStrong | Bucket::BullishWeak));
    let bearish = tickers_where(&ranked, |b| matches!(b, Bucket::BearishStrong | Bucket::BearishWeak));

    let scores: Vec<f64> = ranked.iter().filter_map(|r| r.composite.final_score).collect();
    let average_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    Ranking { ranked, bullish, bearish, average_score }
}

fn tickers_where<'a>(ranked: &[&'a SentimentReport], wanted: impl Fn(Bucket) -> bool) -> Vec<&'a str> {
    ranked
        .iter()
        .filter(|r| wanted(r.composite.bucket))
        .map(|r| r.composite.instrument_id.as_str())
        .collect()
}

fn fmt_score(score: Option<f64>) -> String {
    score.map(|s| format!("{s:.1}")).unwrap_or_else(|| "n/a".to_string())
}

fn fmt_confidence(confidence: Option<f64>) -> String {
    confidence
        .map(|v| format!("{:.1}%", v * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Ranking table: one line per ticker, then the bullish/bearish lists.
pub fn log_ranking(reports: &[SentimentReport]) {
    let ranking = rank(reports);

    info!(tickers = reports.len(), "🏁 Sentiment ranking");
    for (i, report) in ranking.ranked.iter().enumerate() {
        let c = &report.composite;
        info!(
            rank       = i + 1,
            ticker     = %c.instrument_id,
            score      = %fmt_score(c.final_score),
            bucket     = ?c.bucket,
            articles   = c.articles_attempted,
            confidence = %fmt_confidence(c.avg_confidence),
            "Ranked"
        );
    }

    info!(
        bullish       = %ranking.bullish.join(", "),
        bearish       = %ranking.bearish.join(", "),
        average_score = %fmt_score(ranking.average_score),
        "📈 Ranking summary"
    );
}

// ─── Tests ────────────────────────────────────────────────────────────────────
