//! Domain models shared by the engine and its collaborators.

pub mod article;
pub mod judgment;
pub mod outcome;
pub mod result;

pub use article::{Article, ArticleId};
pub use judgment::{Judgment, Label};
pub use outcome::{ArticleOutcome, Failure, Outcome, OutcomeSet};
pub use result::{Bucket, BucketCounts, CompositeResult, SentimentReport};
