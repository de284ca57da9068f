//! services/tracker/src/adapters/plan_llm.rs
//!
//! This module contains the adapter for the plan-generating LLM.
//! It implements the `PlanGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::responses::CreateResponseArgs,
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use study_os_core::{
    domain::{PlanRequest, TaskDraft},
    ports::{PlanGenerationService, PortError, PortResult},
    syllabus::SUBJECTS,
};

use super::strip_code_fence;

const PLAN_INSTRUCTIONS: &str = r#"You are a TNPSC Group 1 study planner.
Build a concrete, output-driven plan for the requested day. Rotate subjects and include revision and current affairs.
The total duration must fit inside the available hours.

Respond with a JSON array and nothing else. Every element is:
{"subject": string, "topic": string, "timeEstimate": <minutes as a number>, "outputExpected": string}"#;

const USER_INPUT_TEMPLATE: &str = "Day: {day}\nAvailable time: {hours} hours\nConstraints: {constraints}\nPrevious performance summary: {previous}\nSubjects to choose from: {subjects}";

/// No single task may be planned for longer than a day.
const MAX_TIME_ESTIMATE: f64 = 24.0 * 60.0;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `PlanGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiPlanAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiPlanAdapter {
    /// Creates a new `OpenAiPlanAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlannedTask {
    subject: String,
    topic: String,
    time_estimate: f64,
    output_expected: String,
}

/// Parses the model's answer into drafts. An empty or non-conforming answer is
/// an error; there is no safe default plan.
pub fn parse_plan(text: &str) -> PortResult<Vec<TaskDraft>> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(PortError::InvalidResponse("plan response was empty".to_string()));
    }

    let tasks: Vec<PlannedTask> =
        serde_json::from_str(body).map_err(|e| PortError::InvalidResponse(e.to_string()))?;
    if tasks.is_empty() {
        return Err(PortError::InvalidResponse("plan contained no tasks".to_string()));
    }

    tasks
        .into_iter()
        .map(|task| {
            if !task.time_estimate.is_finite()
                || task.time_estimate < 1.0
                || task.time_estimate > MAX_TIME_ESTIMATE
            {
                return Err(PortError::InvalidResponse(format!(
                    "task '{}' has an invalid time estimate {}",
                    task.topic, task.time_estimate
                )));
            }
            Ok(TaskDraft {
                id: None,
                subject: Some(task.subject),
                topic: Some(task.topic),
                time_estimate: Some(task.time_estimate.round() as u32),
                output_expected: Some(task.output_expected),
            })
        })
        .collect()
}

fn plan_input(request: &PlanRequest) -> String {
    USER_INPUT_TEMPLATE
        .replace("{day}", &request.day_number.to_string())
        .replace("{hours}", &request.available_hours.to_string())
        .replace("{constraints}", &request.constraints)
        .replace("{previous}", &request.previous_performance)
        .replace("{subjects}", &SUBJECTS.join(", "))
}

//=========================================================================================
// `PlanGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PlanGenerationService for OpenAiPlanAdapter {
    async fn generate_plan(&self, request: &PlanRequest) -> PortResult<Vec<TaskDraft>> {
        let user_input = plan_input(request);

        let api_request = CreateResponseArgs::default()
            .model(&self.model)
            .instructions(PLAN_INSTRUCTIONS)
            .input(user_input)
            .max_output_tokens(1500u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .responses()
            .create(api_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let text = response.output_text().unwrap_or_default();
        parse_plan(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_task_array() {
        let text = r#"[
            {"subject": "Indian Polity (Laxmikanth)", "topic": "Parliament", "timeEstimate": 90, "outputExpected": "Notes on sessions"},
            {"subject": "Current Affairs", "topic": "The Hindu", "timeEstimate": 29.6, "outputExpected": "5 MCQs"}
        ]"#;
        let drafts = parse_plan(text).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].topic.as_deref(), Some("Parliament"));
        assert_eq!(drafts[0].time_estimate, Some(90));
        assert_eq!(drafts[1].time_estimate, Some(30));
        assert!(drafts.iter().all(|d| d.id.is_none()));
    }

    #[test]
    fn test_rejects_non_conforming_plans() {
        for text in [
            "",
            "[]",
            "Here is your plan: study hard",
            r#"[{"subject": "Geography", "topic": "Soils"}]"#,
            r#"[{"subject": "Geography", "topic": "Soils", "timeEstimate": 0, "outputExpected": "Map"}]"#,
            r#"[{"subject": "Geography", "topic": "Soils", "timeEstimate": 1e12, "outputExpected": "Map"}]"#,
            r#"[{"subject": "Geography", "topic": "Soils", "timeEstimate": 1441, "outputExpected": "Map"}]"#,
            r#"{"subject": "Geography", "topic": "Soils", "timeEstimate": 30, "outputExpected": "Map"}"#,
        ] {
            assert!(
                matches!(parse_plan(text), Err(PortError::InvalidResponse(_))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_plan_input_lists_subjects() {
        let input = plan_input(&PlanRequest {
            day_number: 4,
            available_hours: 5.5,
            constraints: "College till 2pm".to_string(),
            previous_performance: "Day 3: Strong. Keep going.".to_string(),
        });
        assert!(input.starts_with("Day: 4\nAvailable time: 5.5 hours\n"));
        assert!(input.contains("Constraints: College till 2pm"));
        assert!(input.contains("Indian Polity (Laxmikanth), History (NCERT + TN)"));
        assert!(input.ends_with("Unit 8/9 (TN Admin), Others"));
    }
}
