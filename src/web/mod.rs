mod handlers;
pub mod page;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::llm::provider::LlmProvider;
use crate::service::PolicyAssistant;

pub use handlers::{AskForm, not_found, show_form, submit_form};

pub struct AppState<P> {
    pub assistant: Arc<PolicyAssistant<P>>,
    /// Dropdown entries; the first one is preselected.
    pub models: Arc<[String]>,
}

// Derived Clone would require `P: Clone`.
impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            assistant: Arc::clone(&self.assistant),
            models: Arc::clone(&self.models),
        }
    }
}

impl<P> AppState<P> {
    pub fn new(assistant: PolicyAssistant<P>, models: Vec<String>) -> Self {
        Self {
            assistant: Arc::new(assistant),
            models: models.into(),
        }
    }
}

pub fn router<P>(state: AppState<P>) -> Router
where
    P: LlmProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(show_form::<P>).post(submit_form::<P>))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use super::{AppState, router};
    use crate::llm::provider::{ChatOutput, ChatRequest, LlmError, LlmProvider};
    use crate::service::PolicyAssistant;

    #[derive(Default)]
    struct RecordingProvider {
        seen: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl LlmProvider for RecordingProvider {
        async fn generate(&self, request: ChatRequest) -> Result<ChatOutput, LlmError> {
            self.seen.lock().expect("lock").push(request);
            Ok(ChatOutput {
                text: "Final Answer: Cuti <tahunan> diatur & disetujui manajer.".to_string(),
            })
        }
    }

    fn models() -> Vec<String> {
        vec!["a/one".to_string(), "b/two".to_string()]
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[tokio::test]
    async fn get_root_renders_empty_form() {
        let app = router(AppState::new(
            PolicyAssistant::new(RecordingProvider::default(), "a/one"),
            models(),
        ));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Telkom HC Assistant</h1>"));
        assert!(html.contains("Pilih Model"));
        assert!(html.contains(r#"<option value="a/one" selected>a/one</option>"#));
    }

    #[tokio::test]
    async fn post_root_renders_answer_and_forwards_choices() {
        let provider = RecordingProvider::default();
        let seen = Arc::clone(&provider.seen);
        let app = router(AppState::new(PolicyAssistant::new(provider, "a/one"), models()));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("question=cuti+tahunan%3F&model=b%2Ftwo&temperature=0.2"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(
            "readonly>\nCuti &lt;tahunan&gt; diatur &amp; disetujui manajer.</textarea>"
        ));
        assert!(html.contains("required>\ncuti tahunan?</textarea>"));
        assert!(html.contains(r#"<option value="b/two" selected>b/two</option>"#));
        assert!(html.contains(r#"value="0.2""#));

        let seen = seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "b/two");
        assert_eq!(seen[0].temperature, 0.2);
    }

    fn form_post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request")
    }

    #[tokio::test]
    async fn non_numeric_temperature_renders_error_in_answer_box() {
        let provider = RecordingProvider::default();
        let seen = Arc::clone(&provider.seen);
        let app = router(AppState::new(PolicyAssistant::new(provider, "a/one"), models()));

        let response = app
            .oneshot(form_post("question=cuti&temperature=abc"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(
            "readonly>\n❌ Terjadi kesalahan:\nTemperature &#39;abc&#39; bukan angka yang valid.</textarea>"
        ));
        assert!(html.contains("required>\ncuti</textarea>"));
        assert!(seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn blank_temperature_falls_back_to_default() {
        let provider = RecordingProvider::default();
        let seen = Arc::clone(&provider.seen);
        let app = router(AppState::new(PolicyAssistant::new(provider, "a/one"), models()));

        let response = app
            .oneshot(form_post("question=cuti&temperature="))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("disetujui manajer."));
        assert_eq!(seen.lock().expect("lock")[0].temperature, 0.5);
    }

    #[tokio::test]
    async fn wrong_content_type_still_renders_page() {
        let app = router(AppState::new(
            PolicyAssistant::new(RecordingProvider::default(), "a/one"),
            models(),
        ));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"question":"cuti"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Telkom HC Assistant</h1>"));
        assert!(html.contains("readonly>\n❌ Terjadi kesalahan:\n"));
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found_page() {
        let app = router(AppState::new(
            PolicyAssistant::new(RecordingProvider::default(), "a/one"),
            models(),
        ));

        let response = app
            .oneshot(Request::get("/api/ask").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Halaman /api/ask tidak ditemukan."));
    }
}
