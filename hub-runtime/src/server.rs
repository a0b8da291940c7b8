//! HTTP service
//!
//! - `POST /research` run one research request
//! - `GET /health` liveness
//! - `GET /status` capability descriptor

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use hub_core::{Query, ResearchState, DEFAULT_MAX_SOURCES};

use crate::ResearchAgent;

/// Shared server state
pub struct AppState {
    pub agent: Arc<ResearchAgent>,
    pub started: Instant,
    /// Used when a request omits `max_sources`
    pub default_max_sources: usize,
}

impl AppState {
    pub fn new(agent: ResearchAgent) -> Self {
        Self {
            agent: Arc::new(agent),
            started: Instant::now(),
            default_max_sources: DEFAULT_MAX_SOURCES,
        }
    }

    pub fn with_default_max_sources(mut self, default_max_sources: usize) -> Self {
        self.default_max_sources = default_max_sources;
        self
    }
}

pub type SharedState = Arc<AppState>;

/// `POST /research` body
#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub max_sources: Option<usize>,
    #[serde(default)]
    pub research_type: Option<String>,
}

/// Build the router
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/research", post(research_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process stops
pub async fn run(state: SharedState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Research hub listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    warn!("Rejected research request: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

async fn research_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ResearchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let Some(text) = request.query.filter(|q| !q.trim().is_empty()) else {
        return bad_request("query must not be empty");
    };

    let mut query = Query::new(text)
        .with_max_sources(request.max_sources.unwrap_or(state.default_max_sources));
    if let Some(research_type) = request.research_type {
        query = query.with_research_type(research_type);
    }

    match state.agent.research(query).await {
        Ok(result) if result.state == ResearchState::Failed => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(result)).into_response()
        }
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) if e.is_client_error() => bad_request(e.to_string()),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn status_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let mut descriptor = state.agent.describe(state.started.elapsed());
    descriptor.defaults.max_sources = state.default_max_sources;
    Json(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{agent_with, hit, MockAdapter};
    use axum::body::Body;
    use axum::http::Request;
    use hub_core::{cache_key, AdapterId, MemoryCache, SourceType};
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(agent: ResearchAgent) -> Router {
        router(Arc::new(AppState::new(agent)))
    }

    fn mocks() -> Vec<MockAdapter> {
        vec![
            MockAdapter::new(AdapterId::Web).with_hits(vec![
                hit(AdapterId::Web, SourceType::Web, "EV benefits explained", "https://a.example/ev"),
                hit(AdapterId::Web, SourceType::News, "EV sales", "https://b.example/ev"),
            ]),
            MockAdapter::new(AdapterId::Encyclopedia).with_hits(vec![hit(
                AdapterId::Encyclopedia,
                SourceType::Encyclopedia,
                "Electric vehicle",
                "https://en.wikipedia.org/wiki/Electric_vehicle",
            )]),
        ]
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = ServiceExt::<Request<Body>>::oneshot(app, req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_research(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/research")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, json) = send(app(agent_with(mocks())), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_status_descriptor() {
        let req = Request::builder().uri("/status").body(Body::empty()).unwrap();
        let (status, json) = send(app(agent_with(mocks())), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "research-hub");
        assert_eq!(json["adapters"].as_array().unwrap().len(), 2);
        assert_eq!(json["adapters"][0]["id"], "web");
        assert_eq!(json["categories"].as_array().unwrap().len(), 15);
        assert_eq!(json["summarizer"], "template");
        assert_eq!(json["defaults"]["max_sources"], 10);
        assert_eq!(json["defaults"]["max_sources_cap"], 50);
        assert!(json["uptime_secs"].is_u64());
    }

    #[tokio::test]
    async fn test_research_ok() {
        let (status, json) = send(
            app(agent_with(mocks())),
            post_research(r#"{"query": "ev benefits", "max_sources": 2}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["category"], "automotive");
        assert_eq!(json["sources_found"], 2);
        assert_eq!(json["state"], "done");

        let source = &json["sources"][0];
        for field in ["source_type", "title", "url", "snippet", "origin_adapter", "relevance_score", "credibility_score"] {
            assert!(source.get(field).is_some(), "missing {}", field);
        }
    }

    #[tokio::test]
    async fn test_research_empty_query_is_400() {
        let adapters = mocks();
        let calls: Vec<_> = adapters.iter().map(|m| m.calls()).collect();
        let app = app(agent_with(adapters));

        for body in [r#"{"query": ""}"#, r#"{"query": "   "}"#, r#"{}"#] {
            let (status, json) = send(app.clone(), post_research(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"].is_string());
        }
        assert!(calls.iter().all(|c| c.load(Ordering::SeqCst) == 0));
    }

    #[tokio::test]
    async fn test_research_malformed_json_is_400() {
        let app = app(agent_with(mocks()));
        for body in ["{not json", r#"{"query": "ev", "max_sources": "ten"}"#] {
            let (status, json) = send(app.clone(), post_research(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_research_corrupt_cache_is_500() {
        let cache = Arc::new(MemoryCache::new());
        cache.put_raw(&cache_key("ev benefits", 10, None), "not json", Duration::from_secs(60));
        let agent = agent_with(mocks()).with_cache(cache);

        let (status, json) = send(app(agent), post_research(r#"{"query": "ev benefits"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["state"], "failed");
        assert_eq!(json["sources"].as_array().unwrap().len(), 0);
        assert!(!json["summary"].as_str().unwrap().is_empty());
    }
}
