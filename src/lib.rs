//! # newsclaw — News Sentiment Engine
//!
//! Fetches recent news for one ticker, classifies every article with an LLM
//! under a bounded concurrency budget, and folds the per-article judgments
//! into a confidence-weighted composite score.
//!
//! ## Flow
//! ```text
//! ArticleSource (Polygon) ─▶ Dispatcher ──K slots──▶ Classifier (LLM)
//!                                 │
//!                                 ▼
//!                          OutcomeRecorder ─▶ aggregate ─▶ SentimentReport
//! ```

pub mod classifier;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod news;
pub mod sink;

pub use classifier::{Classifier, LlmClassifier};
pub use config::{AppConfig, EngineConfig, Provider};
pub use engine::SentimentEngine;
pub use error::{AppError, ClassifyError, SourceError};
pub use models::{Bucket, CompositeResult, SentimentReport};
pub use news::{ArticleSource, PolygonNews};
