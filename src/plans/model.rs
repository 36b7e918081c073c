//! Plan data model — plans, tasks, and completion summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::extractor::extract_tasks;
use super::tracker::completion_percentage;

/// One actionable line extracted from a plan's breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// The breakdown line this task came from.
    pub description: String,
    pub completed: bool,
    /// Position in the plan's task list. Used as the lookup key for updates.
    pub task_index: usize,
    /// Text of the `Deadline:` line following the task, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Text of the `Depends on:` line following the task, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
}

impl Task {
    /// Create an incomplete task at `task_index`.
    pub fn new(description: impl Into<String>, task_index: usize) -> Self {
        Self {
            description: description.into(),
            completed: false,
            task_index,
            deadline: None,
            depends_on: None,
        }
    }
}

/// A goal together with its generated breakdown and task checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: u64,
    pub goal: String,
    /// Raw text returned by the LLM.
    pub task_breakdown: String,
    pub created_at: DateTime<Utc>,
    /// Whole-plan flag. Not derived from task completion.
    pub completed: bool,
    pub completion_percentage: u8,
    pub tasks: Vec<Task>,
}

/// A plan that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub goal: String,
    pub task_breakdown: String,
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
}

impl NewPlan {
    /// Build a new plan, extracting its tasks from the breakdown text.
    pub fn new(goal: impl Into<String>, task_breakdown: impl Into<String>) -> Self {
        let task_breakdown = task_breakdown.into();
        let tasks = extract_tasks(&task_breakdown);
        Self {
            goal: goal.into(),
            task_breakdown,
            created_at: Utc::now(),
            tasks,
        }
    }

    /// Assign an id, producing a storable plan.
    pub fn into_plan(self, id: u64) -> Plan {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Plan {
            id,
            goal: self.goal,
            task_breakdown: self.task_breakdown,
            created_at: self.created_at,
            completed: false,
            completion_percentage: completion_percentage(completed, self.tasks.len()),
            tasks: self.tasks,
        }
    }
}

/// Completion counts returned after a task update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub completion_percentage: u8,
    pub completed_count: usize,
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_plan_extracts_tasks() {
        let plan = NewPlan::new("Build a shed", "Task 1: Buy wood\nTask 2: Build it").into_plan(1);
        assert_eq!(plan.id, 1);
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.completion_percentage, 0);
        assert!(!plan.completed);
        assert!(plan.tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn plan_without_tasks_is_zero_percent() {
        let plan = NewPlan::new("Relax", "Just take it easy.").into_plan(3);
        assert!(plan.tasks.is_empty());
        assert_eq!(plan.completion_percentage, 0);
    }

    #[test]
    fn task_optional_fields_omitted() {
        let json = serde_json::to_string(&Task::new("Task 1: Plan", 0)).unwrap();
        assert!(!json.contains("\"deadline\""));
        assert!(!json.contains("\"depends_on\""));
        assert!(json.contains("\"task_index\":0"));
    }

    #[test]
    fn plan_serde_roundtrip() {
        let plan = NewPlan::new("Learn Rust", "Task 1: Read the book\nDeadline: Monday").into_plan(9);
        let json = serde_json::to_string(&plan).unwrap();
        let parsed: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
        assert_eq!(parsed.tasks[0].deadline.as_deref(), Some("Monday"));
    }
}
