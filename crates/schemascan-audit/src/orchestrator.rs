//! Scan orchestration.
//!
//! Sequences validate → fetch → extract → analyze with no branching back,
//! maps each stage's failure to its own [`ScanError`] variant, and returns
//! a single [`ScanReport`]. All-or-nothing per request: no partial results
//! on failure.

use crate::analyzer::ViolationAnalyzer;
use crate::error::{Result, ScanError};
use crate::extract::{truncate_chars, ContentExtractor};
use crate::report::ScanReport;
use schemascan_browser::PageFetcher;
use schemascan_core::AppConfig;
use schemascan_llm::LlmProvider;
use std::sync::Arc;
use url::Url;

/// Orchestrates one scan per call.
///
/// Holds no per-request state: the browser is launched inside the fetch
/// stage and owned exclusively by that request, so one orchestrator can be
/// shared (`Arc`) across concurrent requests.
pub struct ScanOrchestrator {
    fetcher: PageFetcher,
    analyzer: ViolationAnalyzer,
    max_visible_chars: usize,
}

impl ScanOrchestrator {
    /// Create an orchestrator from application config and a provider.
    #[must_use]
    pub fn new(config: &AppConfig, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            fetcher: PageFetcher::new(config.browser.clone()),
            analyzer: ViolationAnalyzer::new(provider, &config.llm),
            max_visible_chars: config.scan.max_visible_chars,
        }
    }

    /// Run the full pipeline for one URL.
    ///
    /// # Errors
    /// - [`ScanError::InvalidUrl`] before any network action
    /// - [`ScanError::Fetch`] for navigation failures and timeouts
    /// - [`ScanError::Analysis`] when the backend fails or replies garbage
    pub async fn scan(&self, raw_url: &str) -> Result<ScanReport> {
        let url = parse_scan_url(raw_url)?;
        tracing::info!(%url, "starting scan");

        let page = self.fetcher.fetch(&url).await?;
        // Read the document, then release the browser unconditionally
        // before acting on the result.
        let html = page.html().await;
        page.close().await;
        let html = html?;

        let content = ContentExtractor::extract(&html);
        tracing::debug!(
            blocks = content.json_ld.len(),
            text_chars = content.visible_text.chars().count(),
            "content extracted"
        );

        let (model_input, truncated) =
            truncate_chars(&content.visible_text, self.max_visible_chars);
        let analysis = self
            .analyzer
            .analyze(&content.json_ld, &model_input, truncated)
            .await?;

        tracing::info!(
            %url,
            status = ?analysis.status,
            violations = analysis.violations.len(),
            "scan complete"
        );

        Ok(ScanReport {
            status: analysis.status,
            summary: analysis.summary,
            violations: analysis.violations,
            json_ld: content.json_ld,
            visible_text: content.visible_text,
            scanned_at: chrono::Utc::now(),
        })
    }
}

/// Validate a scan request URL.
///
/// Rejects anything that is not a well-formed absolute http(s) URL with a
/// host, before any network action is taken.
pub fn parse_scan_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| ScanError::InvalidUrl {
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ScanError::InvalidUrl {
                reason: format!("unsupported scheme '{other}'"),
            })
        }
    }

    if url.host_str().is_none() {
        return Err(ScanError::InvalidUrl {
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}
