//! services/tracker/src/adapters/analysis_llm.rs
//!
//! This module contains the adapter for the end-of-day analysis LLM.
//! It implements the `PerformanceAnalysisService` port from the `core` crate.
//! Failures are returned as errors; substituting the fallback verdict is the
//! job of `ResilientAnalyzer`.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::responses::CreateResponseArgs,
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use study_os_core::{
    domain::{DailyLog, PerformanceFeedback, Verdict},
    ports::{PerformanceAnalysisService, PortError, PortResult},
};

use super::strip_code_fence;

const ANALYSIS_INSTRUCTIONS: &str = r#"You review one day of a TNPSC Group 1 aspirant's study log.
Each slot lists the subject, topic, planned minutes, status (DONE, PARTIAL, MISSED), minutes actually taken, difficulty and any confusions.

Respond with a single JSON object and nothing else:
{"verdict": "Strong" | "Average" | "Poor", "correction": "<one precise instruction for tomorrow>"}

The correction must be one imperative sentence tied to what happened in this log. No generic advice."#;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `PerformanceAnalysisService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

#[derive(Deserialize)]
struct FeedbackWire {
    verdict: String,
    correction: String,
}

/// Parses the model's answer. Anything other than the two-field object with a
/// known verdict and a non-empty correction is an error.
pub fn parse_feedback(text: &str) -> PortResult<PerformanceFeedback> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(PortError::InvalidResponse(
            "analysis response was empty".to_string(),
        ));
    }

    let wire: FeedbackWire =
        serde_json::from_str(body).map_err(|e| PortError::InvalidResponse(e.to_string()))?;
    let verdict = wire
        .verdict
        .parse::<Verdict>()
        .map_err(PortError::InvalidResponse)?;
    let correction = wire.correction.trim().to_string();
    if correction.is_empty() {
        return Err(PortError::InvalidResponse(
            "analysis returned an empty correction".to_string(),
        ));
    }

    Ok(PerformanceFeedback {
        verdict,
        correction,
    })
}

//=========================================================================================
// `PerformanceAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PerformanceAnalysisService for OpenAiAnalysisAdapter {
    async fn analyze_day(&self, log: &DailyLog) -> PortResult<PerformanceFeedback> {
        let serialized_log =
            serde_json::to_string(log).map_err(|e| PortError::Unexpected(e.to_string()))?;

        let request = CreateResponseArgs::default()
            .model(&self.model)
            .instructions(ANALYSIS_INSTRUCTIONS)
            .input(format!("LOG:\n{}", serialized_log))
            .max_output_tokens(300u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Map the client error manually, which respects the orphan rule.
        let response = self
            .client
            .responses()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let text = response.output_text().unwrap_or_default();
        parse_feedback(&text)
    }
}
