//! # engine::recorder
//!
//! [`OutcomeRecorder`] — fan-in point of the dispatcher.
//!
//! One slot per article, keyed by article id and laid out in input order, so
//! completion order never leaks into the result.  The set is only readable
//! after [`close`](OutcomeRecorder::close) (every slot filled) or
//! [`close_cancelled`](OutcomeRecorder::close_cancelled) (gaps become
//! `CANCELLED` failures).
//!
//! Recording an outcome twice for the same article, or for an article that
//! was never registered, breaks the dispatcher's contract and panics.

use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{Article, ArticleId, ArticleOutcome, Failure, Outcome, OutcomeSet};

#[derive(Debug)]
struct Slot {
    article_id: ArticleId,
    title:      String,
    outcome:    Option<Outcome>,
}

#[derive(Debug)]
pub struct OutcomeRecorder {
    slots:   Vec<Slot>,
    index:   HashMap<ArticleId, usize>,
    pending: usize,
}

impl OutcomeRecorder {
    /// Register the batch.  Fails if two articles share an id, since their
    /// outcomes could not be told apart.
    pub fn new(articles: &[Article]) -> Result<Self, AppError> {
        let mut slots = Vec::with_capacity(articles.len());
        let mut index = HashMap::with_capacity(articles.len());

        for (i, article) in articles.iter().enumerate() {
            if index.insert(article.id.clone(), i).is_some() {
                return Err(AppError::DuplicateArticle(article.id.to_string()));
            }
            slots.push(Slot {
                article_id: article.id.clone(),
                title:      article.title.clone(),
                outcome:    None,
            });
        }

        Ok(Self {
            pending: slots.len(),
            slots,
            index,
        })
    }

    pub fn record(&mut self, id: &ArticleId, outcome: Outcome) {
        let Some(&i) = self.index.get(id) else {
            panic!("outcome recorded for article '{id}' which is not part of this batch");
        };
        let slot = &mut self.slots[i];
        assert!(
            slot.outcome.is_none(),
            "duplicate outcome recorded for article '{id}'"
        );
        slot.outcome = Some(outcome);
        self.pending -= 1;
    }

    /// Articles still waiting for an outcome.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_complete(&self) -> bool {
        self.pending == 0
    }

    /// Close a fully recorded batch.
    pub fn close(self) -> Result<OutcomeSet, AppError> {
        if !self.is_complete() {
            return Err(AppError::BatchIncomplete { pending: self.pending });
        }
        Ok(self.seal(false, |_| 0))
    }

    /// Close a batch that was cut short.  Every article without an outcome is
    /// recorded as a cancelled failure carrying `attempts_of(id)` calls; the
    /// set is flagged partial.
    pub fn close_cancelled(self, attempts_of: impl Fn(&ArticleId) -> u32) -> OutcomeSet {
        self.seal(true, attempts_of)
    }

    fn seal(self, cancelled: bool, attempts_of: impl Fn(&ArticleId) -> u32) -> OutcomeSet {
        let outcomes = self
            .slots
            .into_iter()
            .map(|slot| {
                let outcome = slot
                    .outcome
                    .unwrap_or_else(|| Outcome::Failed(Failure::cancelled(attempts_of(&slot.article_id))));
                ArticleOutcome {
                    article_id: slot.article_id,
                    title:      slot.title,
                    outcome,
                }
            })
            .collect();

        OutcomeSet { outcomes, cancelled }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
