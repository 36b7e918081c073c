//! Persistence layer — plan storage in a single JSON file.

pub mod format;
pub mod json_file;
pub mod traits;

pub use json_file::JsonFileStore;
pub use traits::PlanStore;
