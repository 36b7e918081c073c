//! Completion tracking — task toggling and percentage recomputation.

use super::model::{CompletionSummary, Plan};

/// `floor(100 * completed / total)`, or 0 for an empty task list.
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // completed <= total, so the result fits in 0..=100
    (completed.min(total) * 100 / total) as u8
}

impl Plan {
    /// Current completion counts for this plan.
    pub fn completion_summary(&self) -> CompletionSummary {
        let completed_count = self.tasks.iter().filter(|t| t.completed).count();
        let total_count = self.tasks.len();
        CompletionSummary {
            completion_percentage: completion_percentage(completed_count, total_count),
            completed_count,
            total_count,
        }
    }

    /// Recompute `completion_percentage` from the task list.
    pub fn refresh_completion(&mut self) -> CompletionSummary {
        let summary = self.completion_summary();
        self.completion_percentage = summary.completion_percentage;
        summary
    }

    /// Set one task's completion flag.
    ///
    /// Returns `None` without touching the plan if `task_index` is out of range.
    pub fn set_task_completed(
        &mut self,
        task_index: usize,
        completed: bool,
    ) -> Option<CompletionSummary> {
        let task = self.tasks.get_mut(task_index)?;
        task.completed = completed;
        Some(self.refresh_completion())
    }
}
