//! Violation analysis via an external text-generation service.
//!
//! The analyzer prepares the model's input and defensively normalizes its
//! reply; the policy judgment itself is delegated entirely to the model.
//! The model's output is untrusted: every field is coerced with a default
//! and shape mismatches degrade to an empty violation list rather than an
//! error.

use crate::error::AnalysisError;
use crate::prompt::{build_user_prompt, NO_SCHEMA_SUMMARY, SYSTEM_PROMPT};
use crate::report::{Analysis, ScanStatus, Severity, Violation};
use schemascan_llm::{CompletionRequest, LlmProvider};
use serde_json::Value;
use std::sync::Arc;

/// Analyzer that asks an external model to flag policy violations.
pub struct ViolationAnalyzer {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl ViolationAnalyzer {
    /// Create an analyzer backed by the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, llm: &schemascan_core::LlmConfig) -> Self {
        Self {
            provider,
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
        }
    }

    /// Analyze extracted content for structured-data policy violations.
    ///
    /// If `json_ld` is empty the external service is never invoked: the
    /// result is a deterministic local `Fail` with no violations.
    ///
    /// # Errors
    /// Returns [`AnalysisError`] if the service call fails transport-wise
    /// or its reply is not valid JSON.
    pub async fn analyze(
        &self,
        json_ld: &[Value],
        visible_text: &str,
        truncated: bool,
    ) -> Result<Analysis, AnalysisError> {
        if json_ld.is_empty() {
            tracing::info!("no schema markup found, skipping model call");
            return Ok(Analysis {
                status: ScanStatus::Fail,
                summary: NO_SCHEMA_SUMMARY.to_string(),
                violations: Vec::new(),
            });
        }

        let request = CompletionRequest::new(build_user_prompt(json_ld, visible_text, truncated))
            .with_system_prompt(SYSTEM_PROMPT)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_json_mode();

        tracing::debug!(
            provider = self.provider.provider_id(),
            blocks = json_ld.len(),
            "requesting violation analysis"
        );
        let response = self.provider.complete(request).await?;

        normalize_reply(&response.content)
    }
}

/// Normalize a free-form model reply into a typed [`Analysis`].
///
/// Accepted shapes: a bare array (treated as the violations list), an
/// object with a `violations` key, or any other JSON value (empty list).
/// Only invalid JSON is an error.
pub fn normalize_reply(content: &str) -> Result<Analysis, AnalysisError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| AnalysisError::MalformedResponse {
            message: e.to_string(),
        })?;

    Ok(coerce_analysis(&value))
}

fn coerce_analysis(value: &Value) -> Analysis {
    let violations = match value {
        Value::Array(items) => coerce_violations(items),
        Value::Object(map) => map
            .get("violations")
            .and_then(Value::as_array)
            .map(|items| coerce_violations(items))
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let status = value
        .get("status")
        .and_then(Value::as_str)
        .and_then(ScanStatus::parse)
        .unwrap_or_else(|| ScanStatus::from_violations(&violations));

    let summary = value
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Analysis {
        status,
        summary,
        violations,
    }
}

fn coerce_violations(items: &[Value]) -> Vec<Violation> {
    items.iter().filter_map(coerce_violation).collect()
}

/// Coerce one violation entry; non-object entries are dropped, missing
/// fields default, unknown extra fields are ignored.
fn coerce_violation(value: &Value) -> Option<Violation> {
    let map = value.as_object()?;

    Some(Violation {
        severity: Severity::parse_or_low(map.get("severity").and_then(Value::as_str)),
        issue: map
            .get("issue")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        description: map
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        policy_reference: map
            .get("policy_reference")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    })
}
