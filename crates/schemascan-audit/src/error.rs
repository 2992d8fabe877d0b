//! Stage-tagged errors for the scan pipeline.
//!
//! Each pipeline stage owns one failure class; the orchestrator never lets
//! a lower-level error type reach the HTTP boundary unmapped.

use schemascan_browser::BrowserError;
use schemascan_llm::LlmError;
use thiserror::Error;

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors surfaced by the scan orchestrator.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The requested URL is malformed; rejected before any network action.
    #[error("invalid URL: {reason}")]
    InvalidUrl {
        /// Why the URL was rejected
        reason: String,
    },

    /// Page navigation failed (DNS, timeout, TLS, bot-block). Distinct from
    /// analysis failures so callers can tell "bad target site" from
    /// "analysis backend unavailable".
    #[error("scraping failed: {0}")]
    Fetch(#[from] BrowserError),

    /// The analysis backend call failed or its reply could not be coerced.
    #[error("AI analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Errors from the violation analyzer.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Transport-level or API-level failure of the text-generation service.
    #[error("{0}")]
    Provider(#[from] LlmError),

    /// The service replied with something that is not valid JSON.
    #[error("malformed model reply: {message}")]
    MalformedResponse {
        /// Parse failure detail
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScanError::InvalidUrl {
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(err.to_string(), "invalid URL: relative URL without a base");
    }

    #[test]
    fn test_fetch_error_mentions_scraping() {
        let err = ScanError::from(BrowserError::Timeout("navigation exceeded 30s".to_string()));
        assert!(err.to_string().contains("scraping failed"));
    }

    #[test]
    fn test_analysis_error_wraps_malformed_reply() {
        let err = ScanError::from(AnalysisError::MalformedResponse {
            message: "expected value at line 1".to_string(),
        });
        assert!(err.to_string().contains("AI analysis failed"));
        assert!(err.to_string().contains("malformed model reply"));
    }
}
