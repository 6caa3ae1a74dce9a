//! # error
//!
//! Error types for the sentiment engine.
//!
//! Two families:
//!
//! * [`ClassifyError`] — one article's classification went wrong.  The
//!   dispatcher turns it into an [`Outcome::Failed`](crate::models::Outcome)
//!   value; it never escapes as the `Err` of a batch.
//! * [`AppError`] — the run itself cannot proceed (bad configuration, an
//!   unreachable news source, a broken batch contract).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Per-Article Failures ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// Connection refused, DNS failure, non-2xx status other than 429.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call exceeded the per-call timeout.
    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),

    /// Provider answered HTTP 429.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The provider answered, but not with a usable judgment.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The batch was cancelled before this article got an answer.
    #[error("cancelled before completion")]
    Cancelled,

    /// The classification task panicked.
    #[error("classifier task panicked: {0}")]
    Panicked(String),
}

/// Serialisable discriminant of [`ClassifyError`], used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    Transport,
    Timeout,
    RateLimited,
    MalformedResponse,
    Cancelled,
    Panicked,
}

impl ClassifyError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClassifyError::Transport(_) => FailureKind::Transport,
            ClassifyError::Timeout(_) => FailureKind::Timeout,
            ClassifyError::RateLimited(_) => FailureKind::RateLimited,
            ClassifyError::MalformedResponse(_) => FailureKind::MalformedResponse,
            ClassifyError::Cancelled => FailureKind::Cancelled,
            ClassifyError::Panicked(_) => FailureKind::Panicked,
        }
    }

    /// Transport, timeout and rate-limit failures.  Malformed responses are
    /// never retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClassifyError::Transport(_) | ClassifyError::Timeout(_) | ClassifyError::RateLimited(_)
        )
    }
}

// ─── News Source Failures ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("news source unreachable: {0}")]
    Transport(String),

    #[error("news API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("news response could not be decoded: {0}")]
    Decode(String),
}

// ─── Run-Level Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration — surfaced before any dispatch begins.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty or otherwise unusable instrument identifier.
    #[error("Invalid ticker: '{0}'")]
    InvalidTicker(String),

    /// The same article id appeared twice in one batch.
    #[error("Duplicate article id in batch: {0}")]
    DuplicateArticle(String),

    /// The recorder was closed while some articles still had no outcome.
    #[error("Batch closed with {pending} article(s) still pending")]
    BatchIncomplete { pending: usize },

    /// The article source could not be reached or answered garbage.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
