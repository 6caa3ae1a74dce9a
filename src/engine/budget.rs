//! # engine::budget
//!
//! [`ConcurrencyBudget`] — the cap on simultaneously in-flight classifier
//! calls.  It is an explicit object handed to the dispatcher, never a global,
//! so two dispatchers can share one budget (same provider key) or a test can
//! run with K = 1 for strict sequencing.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{AppError, ClassifyError};

#[derive(Debug, Clone)]
pub struct ConcurrencyBudget {
    slots: Arc<Semaphore>,
    limit: usize,
}

impl ConcurrencyBudget {
    pub fn new(limit: usize) -> Result<Self, AppError> {
        if limit == 0 {
            return Err(AppError::config("concurrency budget must be at least 1"));
        }
        if limit > Semaphore::MAX_PERMITS {
            return Err(AppError::config(format!(
                "concurrency budget {limit} exceeds {}",
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(Self {
            slots: Arc::new(Semaphore::new(limit)),
            limit,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Wait for a slot.  The slot is released when the permit drops, whether
    /// the call succeeded, failed, or the task was aborted.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, ClassifyError> {
        Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| ClassifyError::Cancelled)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_rejected() {
        assert!(matches!(ConcurrencyBudget::new(0), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_permit_released_on_drop() {
        let budget = ConcurrencyBudget::new(2).unwrap();
        let first = budget.acquire().await.unwrap();
        let _second = budget.acquire().await.unwrap();
        assert_eq!(budget.available(), 0);

        drop(first);
        assert_eq!(budget.available(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_slots() {
        let budget = ConcurrencyBudget::new(1).unwrap();
        let shared = budget.clone();
        let _permit = budget.acquire().await.unwrap();
        assert_eq!(shared.available(), 0);
    }
}
