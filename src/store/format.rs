//! On-disk plan file format and migration-on-read.
//!
//! Two layouts are accepted when loading:
//! - v1: a bare JSON array of plan records. Records written before task
//!   tracking have no `tasks` or `completion_percentage`.
//! - v2: `{"version": 2, "next_id": N, "plans": [...]}`.
//!
//! Only v2 is ever written.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::plans::extractor::extract_tasks;
use crate::plans::model::{Plan, Task};

/// Current file format version.
pub const CURRENT_VERSION: u32 = 2;

/// In-memory contents of the plan file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanFile {
    pub version: u32,
    /// Next id to hand out. Never decreases, so ids are not reused.
    pub next_id: u64,
    pub plans: Vec<Plan>,
}

impl Default for PlanFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            next_id: 1,
            plans: Vec::new(),
        }
    }
}

impl PlanFile {
    /// Parse either layout and migrate it to the current one.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let stored: StoredFile = serde_json::from_str(json)?;
        Ok(stored.migrate())
    }

    /// Hand out the next id.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFile {
    Legacy(Vec<PlanRecord>),
    Versioned(VersionedFile),
}

#[derive(Deserialize)]
struct VersionedFile {
    #[allow(dead_code)] // only version 2 exists so far
    version: u32,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    plans: Vec<PlanRecord>,
}

impl StoredFile {
    fn migrate(self) -> PlanFile {
        let (records, stored_next_id) = match self {
            StoredFile::Legacy(records) => (records, 0),
            StoredFile::Versioned(file) => (file.plans, file.next_id),
        };

        let plans: Vec<Plan> = records.into_iter().map(PlanRecord::migrate).collect();
        let max_id = plans.iter().map(|p| p.id).max().unwrap_or(0);

        PlanFile {
            version: CURRENT_VERSION,
            next_id: stored_next_id.max(max_id + 1),
            plans,
        }
    }
}

/// A plan as found on disk, with the fields older records may lack.
#[derive(Deserialize)]
struct PlanRecord {
    id: u64,
    #[serde(default)]
    goal: String,
    #[serde(default)]
    task_breakdown: String,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed: bool,
    tasks: Option<Vec<Task>>,
}

impl PlanRecord {
    fn migrate(self) -> Plan {
        let tasks = self
            .tasks
            .unwrap_or_else(|| extract_tasks(&self.task_breakdown));

        let mut plan = Plan {
            id: self.id,
            goal: self.goal,
            task_breakdown: self.task_breakdown,
            created_at: self.created_at,
            completed: self.completed,
            completion_percentage: 0,
            tasks,
        };
        plan.refresh_completion();
        plan
    }
}

/// Accept RFC 3339 timestamps and naive ISO-8601 ones (read as UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
