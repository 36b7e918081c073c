//! JSON file–backed plan store.
//!
//! The whole collection lives in memory behind a mutex. Each mutation is
//! applied to a copy, the copy is written to disk in full, and only then does
//! it replace the in-memory state, so a failed write leaves the store as it was.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::format::PlanFile;
use super::traits::PlanStore;
use crate::error::StoreError;
use crate::plans::model::{CompletionSummary, NewPlan, Plan};

/// Plan store persisted as a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<PlanFile>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading any existing plans.
    ///
    /// A missing or unreadable file yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let file = load(&path).await;
        info!(
            path = %path.display(),
            plans = file.plans.len(),
            next_id = file.next_id,
            "Plan store opened"
        );

        Ok(Self {
            path,
            state: Mutex::new(file),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, file: &PlanFile) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), plans = file.plans.len(), "Plan store flushed");
        Ok(())
    }
}

/// Read and migrate the plan file. Any failure is logged and treated as empty.
async fn load(path: &Path) -> PlanFile {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No plan file yet, starting empty");
            return PlanFile::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read plan file, starting empty");
            return PlanFile::default();
        }
    };

    match PlanFile::parse(&raw) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Plan file is corrupt, starting empty");
            PlanFile::default()
        }
    }
}

fn plan_not_found(id: u64) -> StoreError {
    StoreError::NotFound {
        entity: "Plan".to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl PlanStore for JsonFileStore {
    async fn append(&self, plan: NewPlan) -> Result<Plan, StoreError> {
        let mut state = self.state.lock().await;

        let mut next = state.clone();
        let plan = plan.into_plan(next.allocate_id());
        next.plans.push(plan.clone());

        self.flush(&next).await?;
        *state = next;

        info!(plan_id = plan.id, tasks = plan.tasks.len(), "Plan saved");
        Ok(plan)
    }

    async fn list(&self) -> Result<Vec<Plan>, StoreError> {
        Ok(self.state.lock().await.plans.clone())
    }

    async fn get(&self, id: u64) -> Result<Option<Plan>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.plans.iter().find(|p| p.id == id).cloned())
    }

    async fn update_task(
        &self,
        id: u64,
        task_index: usize,
        completed: bool,
    ) -> Result<CompletionSummary, StoreError> {
        let mut state = self.state.lock().await;

        let mut next = state.clone();
        let plan = next
            .plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| plan_not_found(id))?;

        let summary = plan
            .set_task_completed(task_index, completed)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Task".to_string(),
                id: format!("{task_index} of plan {id}"),
            })?;

        self.flush(&next).await?;
        *state = next;

        info!(
            plan_id = id,
            task_index,
            completed,
            completion_percentage = summary.completion_percentage,
            "Task updated"
        );
        Ok(summary)
    }

    async fn delete(&self, id: u64) -> Result<Option<Plan>, StoreError> {
        let mut state = self.state.lock().await;

        let Some(pos) = state.plans.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        let mut next = state.clone();
        let removed = next.plans.remove(pos);

        self.flush(&next).await?;
        *state = next;

        info!(plan_id = id, "Plan deleted");
        Ok(Some(removed))
    }
}
