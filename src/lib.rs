//! Smart Task Planner — breaks goals into tracked task checklists.

pub mod config;
pub mod error;
pub mod llm;
pub mod plans;
pub mod routes;
pub mod store;
