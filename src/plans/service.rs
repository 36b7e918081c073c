//! Plan service: goal submission, resource suggestions and plan lifecycle.

use std::sync::Arc;

use tracing::{info, warn};

use super::model::{CompletionSummary, NewPlan, Plan};
use super::prompts;
use crate::error::PlanError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::store::PlanStore;

/// Coordinates the LLM and the plan store.
pub struct PlanService {
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn PlanStore>,
}

impl PlanService {
    pub fn new(llm: Arc<dyn LlmProvider>, store: Arc<dyn PlanStore>) -> Self {
        Self { llm, store }
    }

    /// Ask the LLM to break `goal` into tasks and save the result as a new plan.
    pub async fn submit_goal(&self, goal: &str) -> Result<Plan, PlanError> {
        if goal.trim().is_empty() {
            return Err(PlanError::InvalidInput("No goal provided".to_string()));
        }

        info!(model = self.llm.model_name(), "Requesting goal breakdown");
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::PLANNER_PERSONA),
            ChatMessage::user(prompts::breakdown_prompt(goal)),
        ])
        .with_temperature(prompts::BREAKDOWN_TEMPERATURE);
        let response = self.llm.complete(request).await.inspect_err(|e| {
            warn!(error = %e, "Goal breakdown failed");
        })?;

        let plan = self.store.append(NewPlan::new(goal, response.content)).await?;
        info!(
            plan_id = plan.id,
            tasks = plan.tasks.len(),
            output_tokens = response.output_tokens,
            "Plan created"
        );
        Ok(plan)
    }

    /// Ask the LLM for resources that help with one task of a goal.
    pub async fn suggest_resources(&self, goal: &str, task: &str) -> Result<String, PlanError> {
        if goal.trim().is_empty() || task.trim().is_empty() {
            return Err(PlanError::InvalidInput(
                "Both goal and task are required".to_string(),
            ));
        }

        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::PLANNER_PERSONA),
            ChatMessage::user(prompts::resources_prompt(goal, task)),
        ])
        .with_temperature(prompts::RESOURCES_TEMPERATURE)
        .with_max_tokens(prompts::RESOURCES_MAX_TOKENS);
        let response = self.llm.complete(request).await.inspect_err(|e| {
            warn!(error = %e, "Resource suggestion failed");
        })?;
        Ok(response.content)
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>, PlanError> {
        Ok(self.store.list().await?)
    }

    pub async fn get_plan(&self, id: u64) -> Result<Plan, PlanError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| PlanError::NotFound(format!("Plan {id} not found")))
    }

    /// Delete a plan, returning it.
    pub async fn delete_plan(&self, id: u64) -> Result<Plan, PlanError> {
        self.store
            .delete(id)
            .await?
            .ok_or_else(|| PlanError::NotFound(format!("Plan {id} not found")))
    }

    /// Mark one task complete or incomplete.
    pub async fn update_task(
        &self,
        plan_id: u64,
        task_index: usize,
        completed: bool,
    ) -> Result<CompletionSummary, PlanError> {
        Ok(self
            .store
            .update_task(plan_id, task_index, completed)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::LlmError;
    use crate::llm::provider::{CompletionResponse, FinishReason, Role};
    use crate::store::JsonFileStore;

    const BREAKDOWN: &str =
        "Task 1: Buy materials\nDeadline: Friday\nTask 2: Assemble\nDepends on: Task 1";

    /// Records requests and answers with a fixed breakdown.
    struct RecordingLlm {
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl RecordingLlm {
        /// Last (user) message of each recorded request.
        fn prompts(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter_map(|r| r.messages.last().map(|m| m.content.clone()))
                .collect()
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingLlm {
        fn model_name(&self) -> &str {
            "recording"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            Ok(CompletionResponse {
                content: BREAKDOWN.to_string(),
                input_tokens: 0,
                output_tokens: 0,
                finish_reason: FinishReason::Stop,
            })
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        fn model_name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::RequestFailed {
                provider: "failing".into(),
                reason: "boom".into(),
            })
        }
    }

    async fn service_with(llm: Arc<dyn LlmProvider>) -> (tempfile::TempDir, PlanService) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("plans.json")).await.unwrap();
        (dir, PlanService::new(llm, Arc::new(store)))
    }

    fn recording() -> Arc<RecordingLlm> {
        Arc::new(RecordingLlm {
            requests: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn submit_goal_creates_plan_with_tasks() {
        let llm = recording();
        let (_dir, service) = service_with(llm.clone()).await;

        let plan = service.submit_goal("Build a birdhouse").await.unwrap();
        assert_eq!(plan.id, 1);
        assert_eq!(plan.goal, "Build a birdhouse");
        assert_eq!(plan.task_breakdown, BREAKDOWN);
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.completion_percentage, 0);

        assert!(llm.prompts()[0].contains("\"Build a birdhouse\""));
    }

    #[tokio::test]
    async fn empty_goal_is_invalid_and_skips_llm() {
        let llm = recording();
        let (_dir, service) = service_with(llm.clone()).await;

        for goal in ["", "   "] {
            let err = service.submit_goal(goal).await.unwrap_err();
            assert!(matches!(err, PlanError::InvalidInput(_)));
        }
        assert!(llm.prompts().is_empty());
        assert!(service.list_plans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_creates_nothing() {
        let (_dir, service) = service_with(Arc::new(FailingLlm)).await;
        let err = service.submit_goal("Anything").await.unwrap_err();
        assert!(matches!(err, PlanError::Upstream(_)));
        assert!(err.to_string().contains("boom"));
        assert!(service.list_plans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn suggest_resources_requires_both_fields() {
        let (_dir, service) = service_with(recording()).await;
        assert!(matches!(
            service.suggest_resources("goal", " ").await,
            Err(PlanError::InvalidInput(_))
        ));
        assert!(matches!(
            service.suggest_resources("", "task").await,
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn suggest_resources_returns_llm_text() {
        let llm = recording();
        let (_dir, service) = service_with(llm.clone()).await;
        let text = service
            .suggest_resources("Build a birdhouse", "Task 1: Buy materials")
            .await
            .unwrap();
        assert_eq!(text, BREAKDOWN);
        assert!(llm.prompts()[0].contains("Task 1: Buy materials"));
        assert!(service.list_plans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn requests_carry_persona_and_sampling_settings() {
        let llm = recording();
        let (_dir, service) = service_with(llm.clone()).await;
        service.submit_goal("Build a birdhouse").await.unwrap();
        service
            .suggest_resources("Build a birdhouse", "Task 1: Buy materials")
            .await
            .unwrap();

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        for request in requests.iter() {
            assert_eq!(request.messages.len(), 2);
            assert_eq!(request.messages[0].role, Role::System);
            assert_eq!(request.messages[0].content, prompts::PLANNER_PERSONA);
            assert_eq!(request.messages[1].role, Role::User);
        }

        let breakdown = &requests[0];
        assert_eq!(breakdown.temperature, Some(prompts::BREAKDOWN_TEMPERATURE));
        assert!(breakdown.max_tokens.is_none());

        let resources = &requests[1];
        assert_eq!(resources.temperature, Some(prompts::RESOURCES_TEMPERATURE));
        assert_eq!(resources.max_tokens, Some(prompts::RESOURCES_MAX_TOKENS));
    }

    #[tokio::test]
    async fn update_task_reports_completion() {
        let (_dir, service) = service_with(recording()).await;
        let plan = service.submit_goal("Build a birdhouse").await.unwrap();

        let summary = service.update_task(plan.id, 0, true).await.unwrap();
        assert_eq!(
            summary,
            CompletionSummary {
                completion_percentage: 50,
                completed_count: 1,
                total_count: 2,
            }
        );
    }

    #[tokio::test]
    async fn update_task_unknown_plan_leaves_store_unchanged() {
        let (_dir, service) = service_with(recording()).await;
        service.submit_goal("Build a birdhouse").await.unwrap();
        let before = service.list_plans().await.unwrap();

        let err = service.update_task(7, 0, true).await.unwrap_err();
        assert!(matches!(err, PlanError::NotFound(_)));
        assert_eq!(service.list_plans().await.unwrap(), before);
    }

    #[tokio::test]
    async fn not_found_messages_name_the_plan() {
        let (_dir, service) = service_with(recording()).await;
        for err in [
            service.get_plan(9).await.unwrap_err(),
            service.delete_plan(9).await.unwrap_err(),
            service.update_task(9, 0, true).await.unwrap_err(),
        ] {
            assert_eq!(err.to_string(), "Plan 9 not found");
        }
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (_dir, service) = service_with(recording()).await;
        let plan = service.submit_goal("Build a birdhouse").await.unwrap();

        let deleted = service.delete_plan(plan.id).await.unwrap();
        assert_eq!(deleted.goal, "Build a birdhouse");
        assert!(matches!(
            service.get_plan(plan.id).await,
            Err(PlanError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_plan(plan.id).await,
            Err(PlanError::NotFound(_))
        ));
    }
}
