//! Router and shared application state.

use crate::routes;
use axum::routing::{get, post};
use axum::Router;
use schemascan_audit::ScanOrchestrator;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// The orchestrator is stateless across requests; each scan owns its own
/// browser instance internally.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ScanOrchestrator>,
}

/// Build the axum application router.
pub fn build_app(orchestrator: Arc<ScanOrchestrator>) -> Router {
    Router::new()
        .route("/", get(routes::root_handler))
        .route("/scan", post(routes::scan_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { orchestrator })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use schemascan_core::AppConfig;
    use schemascan_llm::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
    use tower::ServiceExt;

    /// Provider that must never be reached in these tests.
    struct UnreachableProvider;

    #[async_trait]
    impl LlmProvider for UnreachableProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::Internal("unexpected model call in test".to_string()))
        }

        fn provider_id(&self) -> &str {
            "unreachable"
        }
    }

    fn test_app() -> Router {
        let orchestrator = Arc::new(ScanOrchestrator::new(
            &AppConfig::default(),
            Arc::new(UnreachableProvider),
        ));
        build_app(orchestrator)
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let response = test_app()
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("JSON body");
        assert_eq!(body["endpoints"][0], "/scan");
    }

    #[tokio::test]
    async fn test_malformed_url_rejected_before_any_network_action() {
        let request = Request::post("/scan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"url": "not a url"}"#))
            .expect("request");

        let response = test_app().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("JSON body");
        assert!(body["detail"]
            .as_str()
            .expect("detail string")
            .contains("invalid URL"));
    }

    #[tokio::test]
    async fn test_missing_url_field_is_client_error() {
        let request = Request::post("/scan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .expect("request");

        let response = test_app().oneshot(request).await.expect("response");
        assert!(response.status().is_client_error());
    }
}
