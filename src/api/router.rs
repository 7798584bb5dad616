//! HTTP router.
//!
//! Returns a composable `Router` with all endpoints nested under
//! `/api/`. State is injected via `with_state` so tests can mount the
//! same router over mocked components.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::AppState;

/// Uploads are single images or short notes; 10 MiB is generous.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn api_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/chat", post(endpoints::chat::send))
        .route("/labs/analyze", post(endpoints::labs::analyze))
        .route("/risk", post(endpoints::risk::predict))
        .route("/interactions", post(endpoints::interactions::check))
        .route("/report", post(endpoints::report::generate))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::conversation::SessionStore;
    use crate::llm::{FailoverChain, MockChatModel};
    use crate::rag::{EmbeddingModel, InMemoryVectorSearch, RagError, UnconfiguredIndex};
    use crate::safety::EmergencyPrefixCheck;

    struct StubEmbedder;

    impl EmbeddingModel for StubEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, RagError> {
            Ok(vec![1.0, 0.0])
        }
        fn dimension(&self) -> usize {
            2
        }
    }

    fn test_state(response: &str) -> Arc<AppState> {
        let mut index = InMemoryVectorSearch::new();
        index.insert(vec![1.0, 0.0], "grounding passage", None);
        Arc::new(AppState {
            chain: FailoverChain::new(vec![Box::new(MockChatModel::succeeding("m", response))]),
            embedder: Box::new(StubEmbedder),
            index: Box::new(index),
            post_check: Box::new(EmergencyPrefixCheck),
            sessions: SessionStore::new(6),
            top_k: 3,
        })
    }

    const BOUNDARY: &str = "test-boundary";

    fn multipart_body(fields: &[(&str, &str)]) -> Body {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Body::from(body)
    }

    fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart_body(fields))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = api_router(test_state("unused"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn chat_answers_plain_text() {
        let app = api_router(test_state("Drink water and rest."));
        let response = app
            .oneshot(multipart_request("/api/chat", &[("msg", "mild headache remedy?")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Drink water and rest.");
    }

    #[tokio::test]
    async fn chat_emergency_phrase_triggers_literal() {
        let app = api_router(test_state("should never be generated"));
        let response = app
            .oneshot(multipart_request(
                "/api/chat",
                &[("msg", "I have chest pain and feel dizzy")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "TRIGGER_EMERGENCY");
    }

    #[tokio::test]
    async fn chat_without_input_is_rejected() {
        let app = api_router(test_state("unused"));
        let response = app
            .oneshot(multipart_request("/api/chat", &[("msg", "")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(body.contains("MISSING_INPUT"));
    }

    #[tokio::test]
    async fn chat_busy_service_returns_503() {
        let state = Arc::new(AppState {
            chain: FailoverChain::new(vec![Box::new(MockChatModel::failing("m"))]),
            embedder: Box::new(StubEmbedder),
            index: Box::new(InMemoryVectorSearch::new()),
            post_check: Box::new(EmergencyPrefixCheck),
            sessions: SessionStore::new(6),
            top_k: 3,
        });
        let app = api_router(state);
        let response = app
            .oneshot(multipart_request("/api/chat", &[("msg", "hello")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_string(response).await;
        assert!(body.contains("SERVICE_BUSY"));
    }

    #[tokio::test]
    async fn chat_without_an_index_fails_instead_of_answering_ungrounded() {
        let state = Arc::new(AppState {
            chain: FailoverChain::new(vec![Box::new(MockChatModel::succeeding(
                "m",
                "an answer with no grounding",
            ))]),
            embedder: Box::new(StubEmbedder),
            index: Box::new(UnconfiguredIndex),
            post_check: Box::new(EmergencyPrefixCheck),
            sessions: SessionStore::new(6),
            top_k: 3,
        });
        let app = api_router(state);
        let response = app
            .oneshot(multipart_request("/api/chat", &[("msg", "what causes migraines?")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_string(response).await;
        assert!(body.contains("UPSTREAM_UNAVAILABLE"));
        assert!(!body.contains("an answer with no grounding"));
    }

    #[tokio::test]
    async fn risk_returns_score_and_insight() {
        let app = api_router(test_state("Moderate risk."));
        let request = Request::builder()
            .method("POST")
            .uri("/api/risk")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"age": 60, "bp": 150, "chol": 250, "smoker": "yes"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"score\":27"));
        assert!(body.contains("Moderate risk."));
    }

    #[tokio::test]
    async fn labs_without_image_is_rejected() {
        let app = api_router(test_state("unused"));
        let response = app
            .oneshot(multipart_request("/api/labs/analyze", &[("other", "x")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("No report provided."));
    }

    #[tokio::test]
    async fn interactions_wraps_result_in_json() {
        let app = api_router(test_state("🟢 LOW/NO RISK"));
        let response = app
            .oneshot(multipart_request(
                "/api/interactions",
                &[("msg", "aspirin, ibuprofen")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"result\""));
        assert!(body.contains("LOW/NO RISK"));
    }

    #[tokio::test]
    async fn report_without_notes_is_rejected() {
        let app = api_router(test_state("unused"));
        let response = app
            .oneshot(multipart_request("/api/report", &[("notes", "")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn report_returns_pdf_attachment() {
        let json = r#"{"summary": "s", "diagnosis": "d", "medications": ["Paracetamol 500mg"], "advice": "rest", "follow_up": "one week"}"#;
        let app = api_router(test_state(json));
        let response = app
            .oneshot(multipart_request(
                "/api/report",
                &[("notes", "fever for two days")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/pdf"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn sessions_are_isolated_by_header() {
        let app = api_router(test_state("an answer"));

        let mut request =
            multipart_request("/api/chat", &[("msg", "first question about sleep")]);
        request
            .headers_mut()
            .insert("x-session-id", "alice".parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut request = multipart_request("/api/chat", &[("msg", "second question")]);
        request
            .headers_mut()
            .insert("x-session-id", "bob".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
