//! Prompt templates sent to the LLM.

/// System prompt shared by every planner request.
pub const PLANNER_PERSONA: &str = "You are a practical project planner. You turn goals into \
     concrete, ordered steps that one person can act on, and you answer in plain text \
     without markdown formatting.";

/// Sampling temperature for goal breakdowns. Kept low so the line format holds.
pub const BREAKDOWN_TEMPERATURE: f32 = 0.3;

/// Sampling temperature for resource suggestions.
pub const RESOURCES_TEMPERATURE: f32 = 0.7;

/// Output cap for resource suggestions.
pub const RESOURCES_MAX_TOKENS: u32 = 1024;

/// Prompt asking for a goal breakdown in the line format the extractor reads.
pub fn breakdown_prompt(goal: &str) -> String {
    format!(
        "Break down this goal into actionable tasks with suggested deadlines and \
         dependencies: \"{goal}\"\n\n\
         Respond in exactly this format, one block per task:\n\n\
         Task 1: [Task description]\n\
         Deadline: [When to complete]\n\
         Depends on: [What needs to be done first]\n\n\
         Task 2: [Task description]\n\
         Deadline: [When to complete]\n\
         Depends on: [What needs to be done first]\n\n\
         Continue for all tasks."
    )
}

/// Prompt asking for learning resources and tools for one task of a goal.
pub fn resources_prompt(goal: &str, task: &str) -> String {
    format!(
        "I am working towards this goal: \"{goal}\"\n\
         My current task is: \"{task}\"\n\n\
         Suggest helpful resources for completing this task: tutorials, articles, \
         tools, or courses. For each resource give its name, what it is, and why \
         it helps with this task. Keep the list short and practical."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::extractor::extract_tasks;

    #[test]
    fn breakdown_prompt_embeds_goal() {
        let prompt = breakdown_prompt("Run a marathon");
        assert!(prompt.contains("\"Run a marathon\""));
        assert!(prompt.contains("Task 1: [Task description]"));
    }

    #[test]
    fn breakdown_prompt_example_matches_extractor_format() {
        // The template's own example lines must be picked up as tasks.
        assert_eq!(extract_tasks(&breakdown_prompt("x")).len(), 2);
    }

    #[test]
    fn resources_prompt_embeds_goal_and_task() {
        let prompt = resources_prompt("Learn piano", "Task 1: Learn scales");
        assert!(prompt.contains("\"Learn piano\""));
        assert!(prompt.contains("\"Task 1: Learn scales\""));
    }
}
