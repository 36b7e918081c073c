//! `PlanStore` trait — single async interface for plan persistence.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::plans::model::{CompletionSummary, NewPlan, Plan};

/// Backend-agnostic plan storage.
///
/// Every mutation is persisted before the call returns.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Assign an id to `plan`, append it, and persist.
    async fn append(&self, plan: NewPlan) -> Result<Plan, StoreError>;

    /// All stored plans in insertion order.
    async fn list(&self) -> Result<Vec<Plan>, StoreError>;

    /// Get a plan by id.
    async fn get(&self, id: u64) -> Result<Option<Plan>, StoreError>;

    /// Set one task's completion flag and recompute the plan's percentage.
    ///
    /// Fails with `StoreError::NotFound` if the plan or the task index does
    /// not exist; nothing is written in that case.
    async fn update_task(
        &self,
        id: u64,
        task_index: usize,
        completed: bool,
    ) -> Result<CompletionSummary, StoreError>;

    /// Remove a plan. Returns the removed plan, or `None` if absent.
    async fn delete(&self, id: u64) -> Result<Option<Plan>, StoreError>;
}
