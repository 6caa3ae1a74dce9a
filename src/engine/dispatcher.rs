//! # engine::dispatcher
//!
//! **Bounded Dispatcher** — one classification task per article, at most K of
//! them talking to the classifier at any moment.
//!
//! ## Per-article task
//! ```text
//! 1. acquire budget slot            (waits while K calls are in flight)
//! 2. classify under call_timeout
//! 3. release slot                   (permit drop — also on error / abort)
//! 4. transient failure + retry left → sleep retry_delay (no slot held) → 1
//! 5. return (article_id, Outcome)
//! ```
//!
//! The coordinating flow fans the tasks out on a `JoinSet` and fans their
//! outcomes into an [`OutcomeRecorder`].  A task failing never touches its
//! siblings.  If the cancellation future resolves first, every task still
//! running is aborted and the recorder closes with the gaps marked cancelled.
//!
//! Each task bumps a shared per-article counter as it issues a call, so a
//! task that panics or is aborted still reports how many calls it made.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::engine::budget::ConcurrencyBudget;
use crate::engine::recorder::OutcomeRecorder;
use crate::error::{AppError, ClassifyError};
use crate::models::{Article, ArticleId, Failure, Outcome, OutcomeSet};

// ─── Call Policy ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CallPolicy {
    pub call_timeout: Duration,
    /// 0 or 1.
    pub max_retries:  u32,
    pub retry_delay:  Duration,
}

impl From<&EngineConfig> for CallPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            call_timeout: config.call_timeout,
            max_retries:  config.max_retries,
            retry_delay:  config.retry_delay,
        }
    }
}

// ─── Dispatcher ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Dispatcher {
    classifier: Arc<dyn Classifier>,
    budget:     ConcurrencyBudget,
    policy:     CallPolicy,
}

impl Dispatcher {
    pub fn new(classifier: Arc<dyn Classifier>, budget: ConcurrencyBudget, policy: CallPolicy) -> Self {
        Self { classifier, budget, policy }
    }

    /// Classify every article and wait for all of them.
    pub async fn dispatch(&self, ticker: &str, articles: &[Article]) -> Result<OutcomeSet, AppError> {
        self.dispatch_until(ticker, articles, std::future::pending()).await
    }

    /// Like [`dispatch`](Self::dispatch), but stops early when `cancel`
    /// resolves.  Outcomes recorded up to that point are kept; the rest become
    /// `CANCELLED` failures and the set is flagged partial.
    pub async fn dispatch_until<C>(
        &self,
        ticker: &str,
        articles: &[Article],
        cancel: C,
    ) -> Result<OutcomeSet, AppError>
    where
        C: Future<Output = ()>,
    {
        let mut recorder = OutcomeRecorder::new(articles)?;
        if articles.is_empty() {
            debug!(ticker, "No articles — nothing to dispatch");
            return recorder.close();
        }

        info!(
            ticker,
            articles    = articles.len(),
            concurrency = self.budget.limit(),
            "Dispatching classification batch"
        );

        let ticker: Arc<str> = Arc::from(ticker);
        let mut tasks = JoinSet::new();
        // Only consulted when a task dies without returning its article id.
        let mut owners = HashMap::with_capacity(articles.len());
        let mut issued: HashMap<ArticleId, Arc<AtomicU32>> = HashMap::with_capacity(articles.len());

        for article in articles {
            let calls = Arc::new(AtomicU32::new(0));
            let handle = tasks.spawn(classify_article(
                Arc::clone(&self.classifier),
                self.budget.clone(),
                self.policy.clone(),
                Arc::clone(&ticker),
                article.clone(),
                Arc::clone(&calls),
            ));
            owners.insert(handle.id(), article.id.clone());
            issued.insert(article.id.clone(), calls);
        }

        let attempts_of = |id: &ArticleId| issued.get(id).map_or(0, |c| c.load(Ordering::SeqCst));

        tokio::pin!(cancel);
        let mut cancelled = false;

        loop {
            tokio::select! {
                biased;

                joined = tasks.join_next_with_id() => match joined {
                    None => break,
                    Some(Ok((_, (article_id, outcome)))) => {
                        recorder.record(&article_id, outcome);
                    }
                    Some(Err(err)) => {
                        let Some(article_id) = owners.get(&err.id()).cloned() else {
                            warn!(error = %err, "Classification task vanished without an owner");
                            continue;
                        };
                        let failure = if err.is_panic() {
                            ClassifyError::Panicked(err.to_string())
                        } else {
                            ClassifyError::Cancelled
                        };
                        let attempts = attempts_of(&article_id);
                        warn!(article_id = %article_id, error = %failure, attempts, "Classification task died");
                        recorder.record(&article_id, Outcome::Failed(Failure::from_error(&failure, attempts)));
                    }
                },

                () = &mut cancel => {
                    warn!(
                        ticker  = %ticker,
                        pending = recorder.pending(),
                        "Batch cancelled — abandoning in-flight calls"
                    );
                    tasks.abort_all();
                    cancelled = true;
                    break;
                }
            }
        }

        // Reap aborted tasks so every slot is back before we return.  A call
        // that finished in the same instant still counts.
        while let Some(joined) = tasks.join_next().await {
            if let Ok((article_id, outcome)) = joined {
                recorder.record(&article_id, outcome);
            }
        }

        let set = if cancelled {
            recorder.close_cancelled(attempts_of)
        } else {
            recorder.close()?
        };

        let succeeded = set.judgments().count();
        info!(
            ticker    = %ticker,
            succeeded,
            failed    = set.len() - succeeded,
            partial   = set.is_partial(),
            "Classification batch closed"
        );

        Ok(set)
    }
}

// ─── Per-Article Task ─────────────────────────────────────────────────────────

async fn classify_article(
    classifier: Arc<dyn Classifier>,
    budget: ConcurrencyBudget,
    policy: CallPolicy,
    ticker: Arc<str>,
    article: Article,
    issued: Arc<AtomicU32>,
) -> (ArticleId, Outcome) {
    let mut attempts = 0u32;

    let outcome = loop {
        let result = {
            let _slot = match budget.acquire().await {
                Ok(permit) => permit,
                Err(err) => break Outcome::Failed(Failure::from_error(&err, attempts)),
            };
            attempts = issued.fetch_add(1, Ordering::SeqCst) + 1;

            match tokio::time::timeout(policy.call_timeout, classifier.classify(&ticker, &article)).await {
                Ok(result) => result,
                Err(_) => Err(ClassifyError::Timeout(policy.call_timeout)),
            }
        };

        match result {
            Ok(judgment) => {
                debug!(
                    article_id = %article.id,
                    label      = ?judgment.label,
                    score      = judgment.score,
                    confidence = judgment.confidence,
                    attempts,
                    "Article classified"
                );
                break Outcome::Judged(judgment);
            }
            Err(err) if err.is_transient() && attempts <= policy.max_retries => {
                warn!(
                    article_id = %article.id,
                    error      = %err,
                    delay      = ?policy.retry_delay,
                    "Transient classifier failure — retrying"
                );
                tokio::time::sleep(policy.retry_delay).await;
            }
            Err(err) => {
                warn!(article_id = %article.id, error = %err, attempts, "Article classification failed");
                break Outcome::Failed(Failure::from_error(&err, attempts));
            }
        }
    };

    (article.id, outcome)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
