//! Task extraction — turns free-form breakdown text into task records.
//!
//! A line is a task iff its trimmed form starts with `Task`. `Deadline:` and
//! `Depends on:` lines between one task line and the next are attached to
//! that task. Everything else is ignored.

use super::model::Task;

const TASK_PREFIX: &str = "Task";
const DEADLINE_LABEL: &str = "deadline:";
const DEPENDS_ON_LABEL: &str = "depends on:";

/// Extract the ordered task list from breakdown text.
pub fn extract_tasks(breakdown: &str) -> Vec<Task> {
    let mut tasks: Vec<Task> = Vec::new();

    for line in breakdown.lines().map(str::trim) {
        if line.starts_with(TASK_PREFIX) {
            tasks.push(Task::new(line, tasks.len()));
            continue;
        }

        let Some(current) = tasks.last_mut() else {
            continue;
        };

        if let Some(deadline) = labelled_value(line, DEADLINE_LABEL) {
            current.deadline.get_or_insert(deadline);
        } else if let Some(depends_on) = labelled_value(line, DEPENDS_ON_LABEL) {
            current.depends_on.get_or_insert(depends_on);
        }
    }

    tasks
}

/// Return the text after `label` if `line` starts with it (ASCII case-insensitive).
fn labelled_value(line: &str, label: &str) -> Option<String> {
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let value = line[label.len()..].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
