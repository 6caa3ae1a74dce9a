//! # engine
//!
//! The concurrent dispatch and aggregation core.
//!
//! * [`budget`]     — counting semaphore capping in-flight classifier calls
//! * [`dispatcher`] — bounded fan-out, per-call timeout, single retry, cancellation
//! * [`recorder`]   — order-independent fan-in, one outcome per article
//! * [`aggregator`] — confidence-weighted composite score and tallies
//! * [`assembler`]  — composite + run metadata → report
//! * [`pipeline`]   — source → dispatcher → aggregator → assembler

pub mod aggregator;
pub mod assembler;
pub mod budget;
pub mod dispatcher;
pub mod pipeline;
pub mod recorder;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{aggregate, aggregate_at};
pub use assembler::{assemble, BatchParams};
pub use budget::ConcurrencyBudget;
pub use dispatcher::{CallPolicy, Dispatcher};
pub use pipeline::SentimentEngine;
pub use recorder::OutcomeRecorder;
