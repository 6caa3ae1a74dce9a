//! # classifier
//!
//! The [`Classifier`] seam: article text in, [`Judgment`] out.  Implementations
//! are remote, slow, rate-limited and allowed to fail; the dispatcher owns
//! timeouts, retries and the concurrency cap, so implementations stay a plain
//! single request.
//!
//! * [`llm`]    — HTTP client for WaveSpeed / Anthropic / OpenAI
//! * [`prompt`] — analyst prompt built from one article
//! * [`parse`]  — model reply → `Judgment`

use async_trait::async_trait;

use crate::error::ClassifyError;
use crate::models::{Article, Judgment};

pub mod llm;
pub mod parse;
pub mod prompt;

pub use llm::LlmClassifier;

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one article about `ticker`.
    async fn classify(&self, ticker: &str, article: &Article) -> Result<Judgment, ClassifyError>;
}
