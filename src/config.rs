//! # config
//!
//! Two layers:
//!
//! * [`EngineConfig`] — the values the engine consumes (concurrency cap,
//!   timeouts, retry policy, batch shape).  `validate()` is the only gate; an
//!   invalid config never reaches the dispatcher.
//! * [`AppConfig`] — what the binary reads from the environment (`.env` is
//!   loaded first by `main`).  Builds an `EngineConfig` plus the credentials
//!   for the news source and the classifier provider.

use std::time::Duration;

use anyhow::{bail, Context};

use crate::error::AppError;

// ─── Watchlists ───────────────────────────────────────────────────────────────

/// Default watchlist for `--all` when `SENTIMENT_TICKERS` is unset.
pub const TECH_STOCKS: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "AMD", "INTC", "CRM",
];

/// Tickers run when the binary gets neither `--ticker` nor `--all`.
pub const DEMO_STOCKS: [&str; 3] = ["AAPL", "NVDA", "MSFT"];

/// Article limit of the demo run unless `--news-limit` is given.
pub const DEMO_NEWS_LIMIT: u32 = 3;

/// Split a comma or whitespace separated list into upper-cased tickers.
pub fn parse_ticker_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect()
}

// ─── Engine Config ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Max classification calls in flight at once (K).
    pub concurrency:   usize,
    /// Per-call timeout applied around each classifier request.
    pub call_timeout:  Duration,
    /// Extra attempts after a transient failure: 0 or 1.
    pub max_retries:   u32,
    /// Fixed pause before the retry.  No budget slot is held while waiting.
    pub retry_delay:   Duration,
    /// How many articles to request from the news source.
    pub article_limit: u32,
    /// News lookback window in days.
    pub lookback_days: u32,
    /// Whole-batch deadline.  On expiry in-flight calls are abandoned and the
    /// batch is reported as partial.
    pub batch_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency:   4,
            call_timeout:  Duration::from_secs(60),
            max_retries:   1,
            retry_delay:   Duration::from_millis(500),
            article_limit: 10,
            lookback_days: 3,
            batch_timeout: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.concurrency == 0 {
            return Err(AppError::config("concurrency must be at least 1"));
        }
        if self.max_retries > 1 {
            return Err(AppError::config(format!(
                "max_retries must be 0 or 1 (got {})",
                self.max_retries
            )));
        }
        if self.call_timeout.is_zero() {
            return Err(AppError::config("call_timeout must be greater than zero"));
        }
        if self.article_limit == 0 {
            return Err(AppError::config("article_limit must be at least 1"));
        }
        if self.lookback_days == 0 {
            return Err(AppError::config("lookback_days must be at least 1"));
        }
        if matches!(self.batch_timeout, Some(t) if t.is_zero()) {
            return Err(AppError::config("batch_timeout must be greater than zero when set"));
        }
        Ok(())
    }
}

// ─── Classifier Provider ──────────────────────────────────────────────────────

/// LLM providers the classifier client can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    WaveSpeed,
    Claude,
    OpenAi,
}

impl Provider {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wavespeed" => Ok(Provider::WaveSpeed),
            "claude" | "anthropic" => Ok(Provider::Claude),
            "openai" => Ok(Provider::OpenAi),
            other => bail!("Unknown CLASSIFIER_PROVIDER: '{other}'. Use 'wavespeed', 'claude' or 'openai'"),
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::WaveSpeed => "anthropic/claude-3.7-sonnet",
            Provider::Claude => "claude-3-5-sonnet-20241022",
            Provider::OpenAi => "gpt-4o",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::WaveSpeed => write!(f, "WaveSpeed any-llm"),
            Provider::Claude => write!(f, "Anthropic Messages"),
            Provider::OpenAi => write!(f, "OpenAI Chat"),
        }
    }
}

// ─── App Config ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub polygon_api_key:  String,
    pub polygon_base_url: String,
    pub provider:         Provider,
    pub classifier_key:   String,
    pub classifier_model: String,
    pub engine:           EngineConfig,
    /// Watchlist used by `--all`.
    pub tickers:          Vec<String>,
    /// Where JSON reports are written; `None` = log only.
    pub output_dir:       Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let polygon_api_key = std::env::var("POLYGON_API_KEY")
            .context("POLYGON_API_KEY environment variable is required")?;

        let provider = Provider::parse(
            &std::env::var("CLASSIFIER_PROVIDER").unwrap_or_else(|_| "wavespeed".to_string()),
        )?;

        let classifier_key = std::env::var("CLASSIFIER_API_KEY")
            .or_else(|_| std::env::var("WAVESPEED_API_KEY"))
            .context("CLASSIFIER_API_KEY (or WAVESPEED_API_KEY) environment variable is required")?;

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            concurrency:   env_parse("SENTIMENT_CONCURRENCY", defaults.concurrency)?,
            call_timeout:  Duration::from_secs(env_parse(
                "SENTIMENT_CALL_TIMEOUT_SECS",
                defaults.call_timeout.as_secs(),
            )?),
            max_retries:   env_parse("SENTIMENT_MAX_RETRIES", defaults.max_retries)?,
            retry_delay:   Duration::from_millis(env_parse(
                "SENTIMENT_RETRY_DELAY_MS",
                defaults.retry_delay.as_millis() as u64,
            )?),
            article_limit: env_parse("NEWS_LIMIT", defaults.article_limit)?,
            lookback_days: env_parse("NEWS_LOOKBACK_DAYS", defaults.lookback_days)?,
            batch_timeout: env_parse_opt::<u64>("SENTIMENT_BATCH_TIMEOUT_SECS")?
                .map(Duration::from_secs),
        };

        Ok(Self {
            polygon_api_key,
            polygon_base_url: std::env::var("POLYGON_BASE_URL")
                .unwrap_or_else(|_| "https://api.polygon.io".to_string()),
            provider,
            classifier_key,
            classifier_model: std::env::var("CLASSIFIER_MODEL")
                .unwrap_or_else(|_| provider.default_model().to_string()),
            engine,
            tickers: std::env::var("SENTIMENT_TICKERS")
                .map(|raw| parse_ticker_list(&raw))
                .ok()
                .filter(|list| !list.is_empty())
                .unwrap_or_else(|| TECH_STOCKS.iter().map(|t| t.to_string()).collect()),
            output_dir: std::env::var("SENTIMENT_OUTPUT_DIR").ok(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    Ok(env_parse_opt(key)?.unwrap_or(default))
}

fn env_parse_opt<T: std::str::FromStr>(key: &str) -> anyhow::Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{key} must be a number (got '{raw}')")),
        Err(_) => Ok(None),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
