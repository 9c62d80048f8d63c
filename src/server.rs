//! HTTP transport for panel messages.
//!
//! Each route maps one panel request onto the shared [`Session`] and answers
//! with the resulting [`PanelMessage`] as JSON. Requests that have nothing to
//! report answer `204 No Content`.

use crate::index::IndexStats;
use crate::model::PanelMessage;
use crate::session::Session;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub session: Mutex<Session>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    /// Comma-separated seed files, absolute or relative to the workspace root.
    pub seed: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExpandRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedFolderRequest {
    pub folder: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CodeRequest {
    Many { paths: Vec<PathBuf> },
    One { path: PathBuf },
}

pub fn router(session: Session) -> Router {
    let state = Arc::new(AppState {
        session: Mutex::new(session),
    });

    Router::new()
        .route("/api/stats", get(stats_handler))
        .route("/api/graph", get(graph_handler))
        .route("/api/expand", post(expand_handler))
        .route("/api/load-more", post(load_more_handler))
        .route("/api/seed-folder", post(seed_folder_handler))
        .route("/api/rescan", post(rescan_handler))
        .route("/api/code", post(code_handler))
        .layer(cors())
        .with_state(state)
}

/// Browsers may only call in from pages served on this machine.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _request: &Parts| is_loopback_origin(origin),
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

fn is_loopback_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let Some(authority) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };
    let host = match authority.strip_prefix('[') {
        Some(v6) => v6.split(']').next().unwrap_or_default(),
        None => authority.split(':').next().unwrap_or_default(),
    };
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

/// Start the HTTP server for a session
pub async fn serve(
    session: Session,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = session.root().map(Path::to_path_buf).unwrap_or_default();
    let app = router(session);

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}/api/graph", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);
    crate::style::serving(&root, &url);

    if open_browser {
        if let Err(e) = open::that(&url) {
            crate::style::warning(&format!("Could not open browser: {}", e));
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}

async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<IndexStats> {
    let mut session = state.session.lock().await;
    let stats = match session.index().await {
        Some(index) => index.stats(),
        None => IndexStats::default(),
    };
    Json(stats)
}

async fn graph_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GraphQuery>,
) -> Json<PanelMessage> {
    let mut session = state.session.lock().await;
    let seeds = parse_seeds(session.root(), query.seed.as_deref());
    Json(session.initial_graph(&seeds).await)
}

async fn expand_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExpandRequest>,
) -> Response {
    let mut session = state.session.lock().await;
    reply(session.expand(&req.ids).await)
}

async fn load_more_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut session = state.session.lock().await;
    reply(session.load_more().await)
}

async fn seed_folder_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeedFolderRequest>,
) -> Json<PanelMessage> {
    let mut session = state.session.lock().await;
    let folder = absolutize(session.root(), &req.folder);
    Json(session.seed_folder(&folder).await)
}

async fn rescan_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.lock().await.rescan();
    StatusCode::NO_CONTENT
}

async fn code_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CodeRequest>,
) -> Json<PanelMessage> {
    let session = state.session.lock().await;
    let msg = match req {
        CodeRequest::One { path } => session.read_code(&absolutize(session.root(), &path)),
        CodeRequest::Many { paths } => {
            let paths: Vec<PathBuf> = paths
                .iter()
                .map(|p| absolutize(session.root(), p))
                .collect();
            session.read_code_many(&paths)
        }
    };
    Json(msg)
}

fn reply(msg: Option<PanelMessage>) -> Response {
    match msg {
        Some(msg) => Json(msg).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

fn parse_seeds(root: Option<&Path>, raw: Option<&str>) -> Vec<PathBuf> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| absolutize(root, Path::new(s)))
        .collect()
}

fn absolutize(root: Option<&Path>, path: &Path) -> PathBuf {
    match root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fs::mock::MockFs;
    use crate::symbols::NoSymbols;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let fs = Arc::new(MockFs::with_files([
            ("/ws/src/a.ts", "import { b } from './b'\n"),
            ("/ws/src/b.ts", "export const b = 1\n"),
            ("/secret.txt", "TOP SECRET"),
        ]));
        router(Session::new(
            Some(PathBuf::from("/ws")),
            Config::default(),
            fs,
            Arc::new(NoSymbols),
        ))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_graph_then_load_more() {
        let app = app();

        let (status, body) = send(&app, post("/api/load-more", json!({}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, get("/api/graph?seed=src/a.ts")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "graph");
        assert_eq!(body["graph"]["nodes"][0]["path"], "/ws/src/a.ts");
        assert_eq!(body["graph"]["nodes"][0]["lang"], "ts");
        assert_eq!(body["graph"]["edges"][0]["sourceLine"], 0);
        assert_eq!(body["graph"]["edges"][0]["targetLine"], 0);

        let (status, body) = send(&app, post("/api/load-more", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "graph");
    }

    #[tokio::test]
    async fn test_expand_answers_expand_result() {
        let app = app();
        let (_, body) = send(&app, get("/api/graph?seed=src/b.ts")).await;
        let id = body["graph"]["nodes"][0]["id"].clone();

        let (status, body) = send(&app, post("/api/expand", json!({ "ids": [id] }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "expandResult");
        assert_eq!(body["graph"]["nodes"][0]["id"], id);
        assert_eq!(body["graph"]["nodes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stats() {
        let (status, body) = send(&app(), get("/api/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["files"], 2);
        assert_eq!(body["typescript"], 2);
        assert_eq!(body["edges"], 1);
    }

    #[tokio::test]
    async fn test_seed_folder_and_rescan() {
        let app = app();
        let (_, body) = send(&app, post("/api/seed-folder", json!({ "folder": "lib" }))).await;
        assert_eq!(body, json!({ "type": "empty", "reason": "no-files-in-folder" }));

        let (_, body) = send(&app, post("/api/seed-folder", json!({ "folder": "src" }))).await;
        assert_eq!(body["graph"]["nodes"].as_array().unwrap().len(), 2);

        let (status, _) = send(&app, post("/api/rescan", json!({}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_code_is_confined_to_the_workspace() {
        let app = app();

        let (_, body) = send(&app, post("/api/code", json!({ "path": "src/b.ts" }))).await;
        assert_eq!(
            body,
            json!({ "type": "code", "path": "/ws/src/b.ts", "content": "export const b = 1\n" })
        );

        let (_, body) = send(&app, post("/api/code", json!({ "path": "../secret.txt" }))).await;
        assert_eq!(body["content"], "");

        let (_, body) = send(
            &app,
            post("/api/code", json!({ "paths": ["/secret.txt", "src/a.ts"] })),
        )
        .await;
        assert_eq!(body["type"], "codeMany");
        assert_eq!(body["entries"][0]["content"], "");
        assert_eq!(body["entries"][1]["content"], "import { b } from './b'\n");
    }

    #[tokio::test]
    async fn test_cors_only_admits_loopback_pages() {
        let preflight = |origin: &str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/api/code")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };
        let app = app();

        let response = app.clone().oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

        let response = app.clone().oneshot(preflight("http://localhost:5173")).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }

    #[test]
    fn test_loopback_origins() {
        let ok = |o: &str| is_loopback_origin(&HeaderValue::from_str(o).unwrap());
        assert!(ok("http://localhost:3000"));
        assert!(ok("http://127.0.0.1"));
        assert!(ok("http://[::1]:8080"));
        assert!(!ok("http://localhost.evil.example"));
        assert!(!ok("https://example.com"));
        assert!(!ok("null"));
    }

    #[test]
    fn test_parse_seeds() {
        let seeds = parse_seeds(Some(Path::new("/ws")), Some("src/a.ts, /abs/b.ts,,"));
        assert_eq!(
            seeds,
            vec![PathBuf::from("/ws/src/a.ts"), PathBuf::from("/abs/b.ts")]
        );
        assert!(parse_seeds(Some(Path::new("/ws")), None).is_empty());
        assert_eq!(
            parse_seeds(None, Some("a.ts")),
            vec![PathBuf::from("a.ts")]
        );
    }

    #[test]
    fn test_code_request_shapes() {
        let one: CodeRequest = serde_json::from_str(r#"{"path": "/ws/a.ts"}"#).unwrap();
        assert!(matches!(one, CodeRequest::One { .. }));

        let many: CodeRequest = serde_json::from_str(r#"{"paths": ["/ws/a.ts"]}"#).unwrap();
        assert!(matches!(many, CodeRequest::Many { ref paths } if paths.len() == 1));
    }
}
