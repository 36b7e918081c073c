//! Plans — goal breakdowns, task extraction, and completion tracking.
//!
//! A plan is created once per submitted goal. After that only its tasks'
//! completion flags change, until the plan is deleted.

pub mod extractor;
pub mod model;
pub mod prompts;
pub mod service;
pub mod tracker;

pub use extractor::extract_tasks;
pub use model::{CompletionSummary, NewPlan, Plan, Task};
pub use service::PlanService;
pub use tracker::completion_percentage;
