//! # classifier::parse
//!
//! Model reply text → [`Judgment`].
//!
//! The reply is expected to be
//! `{"sentiment": "bullish", "score": 75, "confidence": 80, "reason": "..."}`,
//! possibly wrapped in markdown fences or surrounded by chatter.  The prompt
//! pins confidence to a 0-100 scale, so it is always divided by 100.

use serde::Deserialize;

use crate::error::ClassifyError;
use crate::models::{Judgment, Label};

#[derive(Debug, Deserialize)]
struct RawJudgment {
    sentiment:  String,
    score:      f64,
    confidence: f64,
    #[serde(default)]
    reason:     Option<String>,
}

pub fn parse_judgment(text: &str) -> Result<Judgment, ClassifyError> {
    let cleaned = extract_json(text);

    let raw: RawJudgment = serde_json::from_str(cleaned).map_err(|e| {
        ClassifyError::MalformedResponse(format!("{e} in: {}", truncate(cleaned, 200)))
    })?;

    let label: Label = raw.sentiment.parse()?;
    let judgment = Judgment::new(label, raw.score, raw.confidence / 100.0)?;
    Ok(match raw.reason {
        Some(reason) => judgment.with_reason(reason),
        None => judgment,
    })
}

/// Strip markdown code fences, then cut to the outermost `{ ... }`.
fn extract_json(text: &str) -> &str {
    let text = text.trim();

    let unfenced = if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        }
    } else {
        text
    };

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced.trim(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
