//! # engine::pipeline
//!
//! [`SentimentEngine`] — one instrument, one run:
//!
//! ```text
//! ArticleSource ─▶ Dispatcher ─▶ OutcomeRecorder ─▶ aggregate ─▶ assemble ─▶ SentimentReport
//! ```
//!
//! A report is produced for every well-formed request with a reachable
//! source, even when no article could be classified.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::engine::aggregator::aggregate;
use crate::engine::assembler::{assemble, BatchParams};
use crate::engine::budget::ConcurrencyBudget;
use crate::engine::dispatcher::{CallPolicy, Dispatcher};
use crate::error::AppError;
use crate::models::SentimentReport;
use crate::news::ArticleSource;

pub struct SentimentEngine {
    source:     Arc<dyn ArticleSource>,
    dispatcher: Dispatcher,
    config:     EngineConfig,
}

impl SentimentEngine {
    /// Validates `config` and builds a private concurrency budget.
    pub fn new(
        source: Arc<dyn ArticleSource>,
        classifier: Arc<dyn Classifier>,
        config: EngineConfig,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let budget = ConcurrencyBudget::new(config.concurrency)?;
        Ok(Self::with_budget(source, classifier, budget, config))
    }

    /// Use an existing budget, e.g. one shared by several engines hitting the
    /// same provider key.  `config.concurrency` is ignored in favour of the
    /// budget's own limit.
    pub fn with_budget(
        source: Arc<dyn ArticleSource>,
        classifier: Arc<dyn Classifier>,
        budget: ConcurrencyBudget,
        config: EngineConfig,
    ) -> Self {
        let dispatcher = Dispatcher::new(classifier, budget, CallPolicy::from(&config));
        Self { source, dispatcher, config }
    }

    /// Run a full batch, bounded by `batch_timeout` when one is configured.
    pub async fn analyze(&self, ticker: &str) -> Result<SentimentReport, AppError> {
        match self.config.batch_timeout {
            Some(limit) => self.analyze_until(ticker, tokio::time::sleep(limit)).await,
            None => self.analyze_until(ticker, std::future::pending()).await,
        }
    }

    /// Run a full batch, cut short when `cancel` resolves.  A cut-short batch
    /// still yields a report, flagged `partial`.
    pub async fn analyze_until<C>(&self, ticker: &str, cancel: C) -> Result<SentimentReport, AppError>
    where
        C: Future<Output = ()>,
    {
        let ticker = normalise_ticker(ticker)?;
        self.config.validate()?;

        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, ticker = %ticker, "Sentiment run starting");

        let articles = self
            .source
            .fetch(&ticker, self.config.article_limit, self.config.lookback_days)
            .await?;

        if articles.is_empty() {
            warn!(ticker = %ticker, lookback_days = self.config.lookback_days, "No news found");
        }

        let outcomes = self.dispatcher.dispatch_until(&ticker, &articles, cancel).await?;
        let composite = aggregate(&ticker, &outcomes);

        info!(
            run_id      = %run_id,
            ticker      = %ticker,
            score       = ?composite.final_score,
            bucket      = ?composite.bucket,
            succeeded   = composite.articles_succeeded,
            failed      = composite.articles_failed,
            partial     = composite.partial,
            "Sentiment run complete"
        );

        let params = BatchParams {
            run_id,
            lookback_days: self.config.lookback_days,
            article_limit: self.config.article_limit,
        };
        Ok(assemble(params, composite, outcomes.into_outcomes()))
    }
}

fn normalise_ticker(raw: &str) -> Result<String, AppError> {
    let ticker = raw.trim().to_uppercase();
    let valid = !ticker.is_empty()
        && ticker.len() <= 16
        && ticker.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'));

    if valid {
        Ok(ticker)
    } else {
        Err(AppError::InvalidTicker(raw.to_string()))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
