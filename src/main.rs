//! # newsclaw — command-line entry point
//!
//! ```text
//! newsclaw -t AAPL [-t NVDA ...] [-n 10] [-d 3] [-c 4] [-o reports/]
//! newsclaw -a
//! ```
//!
//! Tickers run one after another through a single engine, so the concurrency
//! budget is shared by the whole invocation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsclaw::cli::Cli;
use newsclaw::{sink, AppConfig, LlmClassifier, PolygonNews, SentimentEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env()
            .add_directive("newsclaw=debug".parse()?)
            .add_directive("reqwest=warn".parse()?))
        .init();

    let cli = Cli::parse();

    info!(r#"

  ╔═══════════════════════════════════════════╗
  ║   NEWSCLAW — News Sentiment Engine        ║
  ╚═══════════════════════════════════════════╝"#);

    let mut config = AppConfig::from_env().context("Failed to load config")?;
    cli.apply(&mut config);
    let tickers = cli.selected_tickers(&config);

    if cli.is_demo() {
        info!("No --ticker or --all given, running demo (try `newsclaw -t AAPL` or `newsclaw -a`)");
    }

    info!(
        tickers     = %tickers.join(", "),
        provider    = %config.provider,
        model       = %config.classifier_model,
        concurrency = config.engine.concurrency,
        news_limit  = config.engine.article_limit,
        lookback    = config.engine.lookback_days,
        "Newsclaw started"
    );

    let client = reqwest::Client::new();
    let source = Arc::new(PolygonNews::new(
        client.clone(),
        config.polygon_base_url.clone(),
        config.polygon_api_key.clone(),
    ));
    let classifier = Arc::new(LlmClassifier::new(
        client,
        config.provider,
        config.classifier_key.clone(),
        config.classifier_model.clone(),
    ));

    let engine = SentimentEngine::new(source, classifier, config.engine.clone())
        .context("Invalid engine config")?;

    // A single ticker keeps the fail-fast exit code; several tickers log and move on.
    if let [ticker] = tickers.as_slice() {
        let report = engine
            .analyze(ticker)
            .await
            .with_context(|| format!("Sentiment run failed for {ticker}"))?;
        sink::log_summary(&report);
        if let Some(dir) = &config.output_dir {
            sink::write_json(Path::new(dir), &report).await?;
        }
        return Ok(());
    }

    let mut reports = Vec::with_capacity(tickers.len());
    for ticker in &tickers {
        match engine.analyze(ticker).await {
            Ok(report) => {
                sink::log_summary(&report);
                if let Some(dir) = &config.output_dir {
                    sink::write_json(Path::new(dir), &report).await?;
                }
                reports.push(report);
            }
            Err(e) => {
                error!(ticker = %ticker, error = %e, "❌ Sentiment run failed — skipping ticker");
            }
        }
    }

    if reports.is_empty() {
        bail!("No ticker could be analysed");
    }

    sink::log_ranking(&reports);
    Ok(())
}
