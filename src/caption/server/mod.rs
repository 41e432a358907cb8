// SPDX-License-Identifier: MIT

mod pages;

pub use pages::Pages;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::adk::error::{CaptionError, Result};
use crate::caption::workflow::{CaptionGraph, WorkflowOutcome};

pub const EMPTY_TOPIC_MESSAGE: &str = "Please enter a topic.";
pub const GENERATION_FAILED_MESSAGE: &str = "Error generating post.";

/// Shared handler state: one graph serves every request, each request gets
/// its own run state inside `CaptionGraph::run`
#[derive(Clone)]
pub struct AppState {
    graph: Arc<CaptionGraph>,
    pages: Arc<Pages>,
}

impl AppState {
    pub fn new(graph: Arc<CaptionGraph>) -> Result<Self> {
        Ok(Self {
            graph,
            pages: Arc::new(Pages::new()?),
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/generate", post(generate))
        .route("/api/captions", post(create_caption))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(graph: Arc<CaptionGraph>, addr: SocketAddr) -> Result<()> {
    let app = app(AppState::new(graph)?);

    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn home(State(state): State<AppState>) -> Response {
    html_page(state.pages.home())
}

#[derive(Deserialize)]
struct TopicForm {
    #[serde(default)]
    topic: String,
}

async fn generate(State(state): State<AppState>, Form(form): Form<TopicForm>) -> Response {
    let topic = form.topic.trim();
    if topic.is_empty() {
        return html_page(state.pages.result(EMPTY_TOPIC_MESSAGE, ""));
    }

    match state.graph.run(topic).await {
        Ok(outcome) => {
            let (post, review) = outcome.into_pair();
            html_page(state.pages.result(&post, &review))
        }
        Err(e) => {
            log::error!("Caption generation failed: {}", e);
            html_page(
                state
                    .pages
                    .result(GENERATION_FAILED_MESSAGE, &e.to_string()),
            )
        }
    }
}

#[derive(Deserialize)]
struct CaptionRequest {
    #[serde(default)]
    topic: String,
}

#[derive(Serialize)]
struct CaptionResponse {
    status: &'static str,
    #[serde(flatten)]
    outcome: WorkflowOutcome,
}

async fn create_caption(
    State(state): State<AppState>,
    Json(payload): Json<CaptionRequest>,
) -> Response {
    match state.graph.run(&payload.topic).await {
        Ok(outcome) => Json(CaptionResponse {
            status: "completed",
            outcome,
        })
        .into_response(),
        Err(e) => {
            log::error!("Caption generation failed: {}", e);
            (status_for(&e), Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

fn status_for(error: &CaptionError) -> StatusCode {
    match error {
        CaptionError::Input(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn html_page(rendered: Result<String>) -> Response {
    match rendered {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            log::error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adk::agent::Agent;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct FixedAgent {
        reply: std::result::Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl FixedAgent {
        fn ok(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Agent for FixedAgent {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn run(&self, _input: String) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .map_err(|m| CaptionError::api("Gemini", m))
        }
    }

    fn test_app(generator: Arc<FixedAgent>) -> Router {
        let graph = CaptionGraph::new(generator, FixedAgent::ok("yes"), FixedAgent::ok("unused"));
        app(AppState::new(Arc::new(graph)).unwrap())
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_home_renders_form() {
        let response = test_app(FixedAgent::ok("post"))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#"name="topic""#));
    }

    #[tokio::test]
    async fn test_generate_shows_post_and_review() {
        let response = test_app(FixedAgent::ok("Rust & me"))
            .oneshot(form_request("topic=Rust+adoption"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Rust &amp; me"));
        assert!(body.contains(">yes<"));
    }

    #[tokio::test]
    async fn test_generate_blank_topic_skips_loop() {
        let generator = FixedAgent::ok("post");
        let response = test_app(generator.clone())
            .oneshot(form_request("topic=+++"))
            .await
            .unwrap();

        let body = body_string(response).await;
        assert!(body.contains(EMPTY_TOPIC_MESSAGE));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_missing_topic_field() {
        let generator = FixedAgent::ok("post");
        let response = test_app(generator.clone())
            .oneshot(form_request(""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains(EMPTY_TOPIC_MESSAGE));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_failure_renders_error_page() {
        let response = test_app(FixedAgent::failing("quota exhausted"))
            .oneshot(form_request("topic=Rust"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(GENERATION_FAILED_MESSAGE));
        assert!(body.contains("quota exhausted"));
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/captions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_returns_outcome() {
        let response = test_app(FixedAgent::ok("Final post"))
            .oneshot(json_request(r#"{"topic":"Rust"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["post"], "Final post");
        assert_eq!(value["review"], "yes");
        assert_eq!(value["tries"], 0);
        assert_eq!(value["trace"], json!(["generate_caption", "review_caption"]));
    }

    #[tokio::test]
    async fn test_api_rejects_empty_topic() {
        let response = test_app(FixedAgent::ok("post"))
            .oneshot(json_request(r#"{"topic":"  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_maps_model_failure_to_bad_gateway() {
        let response = test_app(FixedAgent::failing("boom"))
            .oneshot(json_request(r#"{"topic":"Rust"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let value: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(value["error"].as_str().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = test_app(FixedAgent::ok("post"))
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
    }
}
