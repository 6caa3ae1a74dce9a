//! # models::article
//!
//! Defines [`Article`] — one unit of news text about an instrument, as handed
//! over by the news source.  The engine only ever reads it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── ArticleId ────────────────────────────────────────────────────────────────

/// Stable per-article key (provider id, URL, or a hash of the headline).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ─── Article ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id:           ArticleId,
    pub title:        String,
    /// Summary / body text passed verbatim to the classifier.
    pub description:  String,
    /// Publisher name, `"Unknown"` when the source omits it.
    pub source:       String,
    pub url:          Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Publication date as shown to the classifier (`YYYY-MM-DD HH:MM UTC`).
    pub fn published_label(&self) -> String {
        self.published_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
