//! Per-request page fetching.
//!
//! Every call to [`PageFetcher::fetch`] launches its own Chromium instance,
//! so nothing is shared between concurrent scans and a wedged renderer can
//! only ever affect the one request that owns it.

use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use url::Url;

/// Launch flags that suppress the usual automation-detection signals.
const STEALTH_ARGS: [&str; 4] = [
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--no-first-run",
    "--no-default-browser-check",
];

/// `Accept` header presented to target sites; matches what desktop Chrome sends.
const ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Probe for an attached JSON-LD script tag.
const JSON_LD_PROBE: &str =
    r#"document.querySelector('script[type="application/ld+json"]') !== null"#;

/// Page fetcher that drives a headless browser.
///
/// Holds only configuration; the browser itself is launched inside each
/// [`fetch`](Self::fetch) call and owned by the returned [`RenderedPage`].
pub struct PageFetcher {
    config: schemascan_core::BrowserConfig,
}

impl PageFetcher {
    /// Create a new fetcher with the given browser configuration.
    #[must_use]
    pub fn new(config: schemascan_core::BrowserConfig) -> Self {
        Self { config }
    }

    /// Fetch a URL in an isolated browser instance.
    ///
    /// Navigation uses a hard timeout on a DOM-content-loaded readiness
    /// signal, followed by two best-effort waits (network quiescence and
    /// JSON-LD script attachment) that are non-fatal on expiry. Any
    /// navigation failure surfaces as a single [`BrowserError`]; there is
    /// no retry.
    ///
    /// On every error path after launch the browser is closed before the
    /// error is returned.
    pub async fn fetch(&self, url: &Url) -> Result<RenderedPage> {
        let fingerprint = FingerprintConfig::randomized();
        let browser_config = self.build_browser_config()?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // Drive the CDP connection until the browser is closed.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let mut rendered = RenderedPage {
            browser,
            page: None,
            handler_task,
        };

        match self.navigate(&rendered.browser, &fingerprint, url).await {
            Ok(page) => {
                rendered.page = Some(page);
                Ok(rendered)
            }
            Err(e) => {
                rendered.close().await;
                Err(e)
            }
        }
    }

    fn build_browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(self.config.window_width, self.config.window_height)
            .args(STEALTH_ARGS);

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder.build().map_err(BrowserError::Launch)
    }

    async fn navigate(
        &self,
        browser: &Browser,
        fingerprint: &FingerprintConfig,
        url: &Url,
    ) -> Result<Page> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(format!("failed to open page: {e}")))?;

        self.apply_fingerprint(&page, fingerprint).await?;

        let nav_timeout = Duration::from_secs(self.config.navigation_timeout_secs);
        tokio::time::timeout(nav_timeout, page.goto(url.as_str()))
            .await
            .map_err(|_| {
                BrowserError::Timeout(format!(
                    "navigation to {url} exceeded {}s",
                    self.config.navigation_timeout_secs
                ))
            })?
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        // JSON-LD is frequently injected by client-side scripts after the
        // initial load, so give the page a bounded chance to settle. Both
        // waits are best-effort and never fail the fetch.
        let quiescence = Duration::from_secs(self.config.quiescence_timeout_secs);
        if tokio::time::timeout(quiescence, page.wait_for_navigation())
            .await
            .is_err()
        {
            tracing::debug!(%url, "network quiescence wait timed out, continuing");
        }

        wait_for_schema_tag(&page, self.config.schema_wait_timeout_secs).await;

        Ok(page)
    }

    async fn apply_fingerprint(&self, page: &Page, fingerprint: &FingerprintConfig) -> Result<()> {
        let ua_override = SetUserAgentOverrideParams::builder()
            .user_agent(&fingerprint.user_agent)
            .accept_language(&fingerprint.accept_language)
            .build()
            .map_err(BrowserError::Launch)?;

        page.set_user_agent(ua_override)
            .await
            .map_err(|e| BrowserError::Launch(format!("failed to set user agent: {e}")))?;

        let headers = Headers::new(serde_json::json!({ "Accept": ACCEPT_HEADER }));
        page.execute(SetExtraHttpHeadersParams::new(headers))
            .await
            .map_err(|e| BrowserError::Launch(format!("failed to set headers: {e}")))?;

        Ok(())
    }
}

/// Wait (bounded) for an `application/ld+json` script tag to attach.
///
/// Reduces the race against asynchronous schema injection; silently gives
/// up when the deadline passes or the probe cannot run.
async fn wait_for_schema_tag(page: &Page, timeout_secs: u64) {
    let deadline = Instant::now() + Duration::from_secs(timeout_secs);

    while Instant::now() < deadline {
        match page.evaluate(JSON_LD_PROBE).await {
            Ok(result) => {
                if result.into_value::<bool>().unwrap_or(false) {
                    return;
                }
            }
            Err(e) => {
                tracing::debug!("JSON-LD probe failed: {}", e);
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    tracing::debug!("no JSON-LD script tag attached before deadline");
}

/// A rendered page together with the browser that produced it.
///
/// The browser, page, and CDP handler task are scoped to one fetch and
/// must be released via [`close`](Self::close) on every exit path.
pub struct RenderedPage {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
}

impl RenderedPage {
    /// Serialize the current DOM to an HTML string.
    pub async fn html(&self) -> Result<String> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| BrowserError::Evaluation("page already closed".to_string()))?;

        page.content()
            .await
            .map_err(|e| BrowserError::Evaluation(format!("failed to read page content: {e}")))
    }

    /// Shut the browser down and release all associated resources.
    ///
    /// Infallible on purpose: teardown failures are logged, never
    /// propagated, so callers on error paths can close unconditionally.
    pub async fn close(mut self) {
        drop(self.page.take());

        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("browser wait failed: {}", e);
        }
        self.handler_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stealth_args_disable_automation_banner() {
        assert!(STEALTH_ARGS
            .iter()
            .any(|arg| arg.contains("AutomationControlled")));
    }

    #[test]
    fn test_accept_header_is_html_first() {
        assert!(ACCEPT_HEADER.starts_with("text/html"));
    }

    #[test]
    fn test_json_ld_probe_targets_ld_json_scripts() {
        assert!(JSON_LD_PROBE.contains("application/ld+json"));
        assert!(JSON_LD_PROBE.contains("querySelector"));
    }
}
