//! Scan result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a single policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Clear policy breach likely to draw a manual action
    High,
    /// Questionable markup worth reviewing
    Medium,
    /// Minor or uncertain issue
    Low,
}

impl Severity {
    /// Coerce a raw severity string, defaulting to [`Severity::Low`].
    ///
    /// The upstream prompt does not guarantee the field is present or
    /// spelled consistently, so unknown values are never dropped.
    #[must_use]
    pub fn parse_or_low(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("high") => Self::High,
            Some("medium") => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Overall verdict of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    /// No violations detected
    Pass,
    /// Violations detected, or no schema markup present at all
    Fail,
}

impl ScanStatus {
    /// Parse a raw status string, if recognizable.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }

    /// Derive a status from a violation list, for replies that omit one.
    #[must_use]
    pub fn from_violations(violations: &[Violation]) -> Self {
        if violations.is_empty() {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

/// A single detected policy violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// How serious the violation is
    pub severity: Severity,
    /// Short title of the issue
    pub issue: String,
    /// Explanation of what was found
    pub description: String,
    /// Optional reference to the policy being violated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_reference: Option<String>,
}

/// The analyzer's verdict, before extraction artifacts are attached.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Overall verdict
    pub status: ScanStatus,
    /// Short summary of findings
    pub summary: String,
    /// Detected violations, in the order the model reported them
    pub violations: Vec<Violation>,
}

/// Complete result of one scan, handed to the caller as-is.
///
/// Produced once per request and owned exclusively by the orchestrator;
/// nothing here is shared between requests.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Overall verdict
    pub status: ScanStatus,
    /// Short summary of findings
    pub summary: String,
    /// Detected violations
    pub violations: Vec<Violation>,
    /// JSON-LD blocks found on the page, in document order
    pub json_ld: Vec<Value>,
    /// Normalized visible page text (full, not the truncated model input)
    pub visible_text: String,
    /// When the scan completed
    pub scanned_at: DateTime<Utc>,
}
