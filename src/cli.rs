//! # cli — command-line surface of the `newsclaw` binary
//!
//! Flags override the environment; anything not given falls back to
//! [`AppConfig::from_env`](crate::config::AppConfig::from_env).
//!
//! ```text
//! newsclaw -t AAPL            one ticker
//! newsclaw -t AAPL -t NVDA    several, ranked summary at the end
//! newsclaw -a                 the SENTIMENT_TICKERS watchlist
//! newsclaw                    demo: AAPL, NVDA, MSFT with 3 articles each
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::config::{AppConfig, DEMO_NEWS_LIMIT, DEMO_STOCKS};

#[derive(Debug, Parser)]
#[command(name = "newsclaw", version, about = "News sentiment scores per ticker")]
pub struct Cli {
    /// Ticker to analyse, e.g. AAPL (repeatable)
    #[arg(short, long = "ticker", conflicts_with = "all")]
    pub tickers: Vec<String>,

    /// Analyse every ticker of the configured watchlist
    #[arg(short, long)]
    pub all: bool,

    /// Number of news articles to fetch per ticker
    #[arg(short = 'n', long)]
    pub news_limit: Option<u32>,

    /// News lookback window in days
    #[arg(short = 'd', long)]
    pub lookback_days: Option<u32>,

    /// Max classifier calls in flight
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Directory for the JSON reports
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    /// Neither `--ticker` nor `--all` given.
    pub fn is_demo(&self) -> bool {
        self.tickers.is_empty() && !self.all
    }

    /// Tickers to run, in the order they will be analysed.
    pub fn selected_tickers(&self, config: &AppConfig) -> Vec<String> {
        if self.all {
            config.tickers.clone()
        } else if self.is_demo() {
            DEMO_STOCKS.iter().map(|t| t.to_string()).collect()
        } else {
            self.tickers.clone()
        }
    }

    /// Fold flag overrides into the env-derived config.
    pub fn apply(&self, config: &mut AppConfig) {
        match self.news_limit {
            Some(n) => config.engine.article_limit = n,
            None if self.is_demo() => config.engine.article_limit = DEMO_NEWS_LIMIT,
            None => {}
        }
        if let Some(d) = self.lookback_days {
            config.engine.lookback_days = d;
        }
        if let Some(k) = self.concurrency {
            config.engine.concurrency = k;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.display().to_string());
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
