//! # classifier::prompt
//!
//! Builds the analyst prompt for one article.  The model must answer with a
//! bare JSON object that [`parse`](super::parse) can read.

use crate::models::Article;

pub const SYSTEM_PROMPT: &str =
    "You are a professional financial analyst. Always respond with valid JSON only.";

pub fn build_prompt(ticker: &str, article: &Article) -> String {
    let title = article.title.trim();
    let summary = article.description.trim();
    let published = article.published_label();

    format!(r#"You are a professional financial analyst. Analyze the following news about {ticker} stock and provide a sentiment score.

News Title: {title}
News Summary: {summary}
Published: {published}

Return ONLY valid JSON in this exact format (no other text, no markdown):
{{"sentiment": "bullish", "score": 75, "confidence": 80, "reason": "brief explanation"}}

Rules:
- sentiment: must be "bullish", "neutral", or "bearish"
- score: integer 0-100 (50=neutral, 100=extremely bullish, 0=extremely bearish)
- confidence: integer 0-100 (your confidence level)
- reason: brief explanation in under 30 words
- Return ONLY the JSON object, nothing else"#)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
