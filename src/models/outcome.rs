//! # models::outcome
//!
//! Per-article results.  Failure is a first-class value here: a batch is a
//! list of [`ArticleOutcome`]s, some judged and some failed, and nothing else.

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, FailureKind};
use crate::models::{ArticleId, Judgment};

// ─── Failure ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind:     FailureKind,
    pub message:  String,
    /// Calls issued for this article, counting one cut short by a panic or
    /// by cancellation.  0 when cancelled before the first call got a slot.
    pub attempts: u32,
}

impl Failure {
    pub fn from_error(err: &ClassifyError, attempts: u32) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            attempts,
        }
    }

    pub fn cancelled(attempts: u32) -> Self {
        Self::from_error(&ClassifyError::Cancelled, attempts)
    }
}

// ─── Outcome ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Judged(Judgment),
    Failed(Failure),
}

impl Outcome {
    pub fn judgment(&self) -> Option<&Judgment> {
        match self {
            Outcome::Judged(j) => Some(j),
            Outcome::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Judged(_))
    }
}

/// An [`Outcome`] tied back to the article that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleOutcome {
    pub article_id: ArticleId,
    pub title:      String,
    #[serde(flatten)]
    pub outcome:    Outcome,
}

// ─── OutcomeSet ───────────────────────────────────────────────────────────────

/// The closed set of outcomes for one batch, in input order.
///
/// Only the recorder can build one, and only once every article has an
/// outcome (or the batch was cancelled and the gaps were filled).
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeSet {
    pub(crate) outcomes:  Vec<ArticleOutcome>,
    pub(crate) cancelled: bool,
}

impl OutcomeSet {
    pub fn outcomes(&self) -> &[ArticleOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<ArticleOutcome> {
        self.outcomes
    }

    /// `true` when the batch was cut short and some outcomes were synthesised.
    pub fn is_partial(&self) -> bool {
        self.cancelled
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn judgments(&self) -> impl Iterator<Item = &Judgment> {
        self.outcomes.iter().filter_map(|o| o.outcome.judgment())
    }
}
