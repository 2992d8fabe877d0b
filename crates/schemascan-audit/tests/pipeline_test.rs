//! Pipeline tests over synthetic pages with a mocked analysis backend.

use async_trait::async_trait;
use schemascan_audit::{ContentExtractor, ScanStatus, Severity, ViolationAnalyzer};
use schemascan_llm::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Provider returning a canned reply and counting invocations.
struct MockProvider {
    reply: String,
    calls: AtomicUsize,
}

impl MockProvider {
    fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(request.json_mode, "analyzer must request JSON mode");
        Ok(CompletionResponse {
            content: self.reply.clone(),
            model: "mock".to_string(),
            stop_reason: Some("stop".to_string()),
            usage: None,
        })
    }

    fn provider_id(&self) -> &str {
        "mock"
    }
}

fn analyzer_with(provider: Arc<MockProvider>) -> ViolationAnalyzer {
    ViolationAnalyzer::new(provider, &schemascan_core::LlmConfig::default())
}

#[tokio::test]
async fn test_article_with_matching_text_passes() {
    // Scenario A: one Article block, matching visible text, model says Pass.
    let html = r#"
        <html><body>
            <script type="application/ld+json">
                {"@type": "Article", "headline": "How to grow tomatoes"}
            </script>
            <h1>How to grow tomatoes</h1>
            <p>Start with good soil and plenty of sun.</p>
        </body></html>
    "#;
    let content = ContentExtractor::extract(html);
    assert!(content.has_schema());
    assert!(content.visible_text.contains("How to grow tomatoes"));

    let provider = MockProvider::new(
        r#"{"status": "Pass", "summary": "Schema matches visible content", "violations": []}"#,
    );
    let analysis = analyzer_with(provider.clone())
        .analyze(&content.json_ld, &content.visible_text, false)
        .await
        .expect("analysis succeeds");

    assert_eq!(analysis.status, ScanStatus::Pass);
    assert!(analysis.violations.is_empty());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_self_serving_rating_flagged_high() {
    // Scenario B: AggregateRating under Organization, no rating text visible.
    let html = r#"
        <html><body>
            <script type="application/ld+json">
                {"@type": "Organization", "name": "Acme Corp",
                 "aggregateRating": {"@type": "AggregateRating",
                                     "ratingValue": "4.9", "reviewCount": "2048"}}
            </script>
            <h1>Acme Corp</h1>
            <p>We make everything.</p>
        </body></html>
    "#;
    let content = ContentExtractor::extract(html);
    assert!(!content.visible_text.contains("4.9"));

    let provider = MockProvider::new(
        r#"{"status": "Fail",
            "summary": "Self-serving hidden rating markup",
            "violations": [
                {"severity": "High",
                 "issue": "Self-serving rating",
                 "description": "AggregateRating attached to the site's own Organization and not shown in visible text"}
            ]}"#,
    );
    let analysis = analyzer_with(provider.clone())
        .analyze(&content.json_ld, &content.visible_text, false)
        .await
        .expect("analysis succeeds");

    assert_eq!(analysis.status, ScanStatus::Fail);
    assert_eq!(analysis.violations.len(), 1);
    assert_eq!(analysis.violations[0].severity, Severity::High);
    assert!(analysis.violations[0]
        .issue
        .to_lowercase()
        .contains("rating"));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_no_schema_short_circuits_without_model_call() {
    // Scenario D: zero JSON-LD tags -> deterministic Fail, provider untouched.
    let html = "<html><body><h1>Plain page</h1><p>No markup here at all.</p></body></html>";
    let content = ContentExtractor::extract(html);
    assert!(!content.has_schema());

    let provider = MockProvider::new(r#"{"status": "Pass", "violations": []}"#);
    let analysis = analyzer_with(provider.clone())
        .analyze(&content.json_ld, &content.visible_text, false)
        .await
        .expect("short circuit is not an error");

    assert_eq!(analysis.status, ScanStatus::Fail);
    assert!(analysis.violations.is_empty());
    assert!(analysis.summary.to_lowercase().contains("no schema markup"));
    assert_eq!(provider.call_count(), 0, "external service must not be invoked");
}

#[tokio::test]
async fn test_short_circuit_ignores_visible_text() {
    // The deterministic rule holds regardless of page text content.
    let long = "long text ".repeat(1000);
    for text in ["", "short", long.as_str()] {
        let provider = MockProvider::new("{}");
        let analysis = analyzer_with(provider.clone())
            .analyze(&[], text, false)
            .await
            .expect("short circuit");
        assert_eq!(analysis.status, ScanStatus::Fail);
        assert_eq!(provider.call_count(), 0);
    }
}

#[tokio::test]
async fn test_non_json_reply_is_analysis_error() {
    let provider = MockProvider::new("Sorry, I cannot help with that.");
    let result = analyzer_with(provider)
        .analyze(&[serde_json::json!({"@type": "Article"})], "text", false)
        .await;

    assert!(result.is_err(), "prose reply must surface as AnalysisError");
}

#[tokio::test]
async fn test_truncated_flag_reaches_prompt() {
    struct PromptCapture {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmProvider for PromptCapture {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let prompt = &request.messages[0].content;
            assert!(prompt.contains("(truncated)"));
            Ok(CompletionResponse {
                content: r#"{"violations": []}"#.to_string(),
                model: "mock".to_string(),
                stop_reason: None,
                usage: None,
            })
        }

        fn provider_id(&self) -> &str {
            "capture"
        }
    }

    let provider = Arc::new(PromptCapture {
        calls: AtomicUsize::new(0),
    });
    let analyzer = ViolationAnalyzer::new(provider.clone(), &schemascan_core::LlmConfig::default());
    analyzer
        .analyze(&[serde_json::json!({"@type": "Product"})], "cut text", true)
        .await
        .expect("analysis succeeds");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}
