//! Mock upstream shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

/// Request counters per upstream route.
#[derive(Default)]
pub struct Upstream {
    pub items: AtomicUsize,
    pub flaky: AtomicUsize,
    pub broken: AtomicUsize,
    pub pages: AtomicUsize,
}

impl Upstream {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

async fn items(
    State(up): State<Arc<Upstream>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Json<Value> {
    let n = up.items.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "served": n, "params": params }))
}

/// Fails with 503 on the first two calls, then succeeds.
async fn flaky(State(up): State<Arc<Upstream>>) -> Result<Json<Value>, StatusCode> {
    let n = up.flaky.fetch_add(1, Ordering::SeqCst) + 1;
    if n <= 2 {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    } else {
        Ok(Json(json!({ "attempt": n })))
    }
}

async fn broken(State(up): State<Arc<Upstream>>) -> StatusCode {
    up.broken.fetch_add(1, Ordering::SeqCst);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Three pages of `limit` numbers each, then an empty page.
async fn pages(
    State(up): State<Arc<Upstream>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Json<Value> {
    up.pages.fetch_add(1, Ordering::SeqCst);
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: u32 = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);

    if page > 3 {
        return Json(json!([]));
    }
    let start = (page - 1) * limit;
    Json(json!((start..start + limit).collect::<Vec<_>>()))
}

async fn widgets(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "created": body })))
}

async fn whoami(headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({ "authorization": auth }))
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_json() -> &'static str {
    "<html>oops</html>"
}

/// Starts the mock upstream on an ephemeral port, returning its base URL.
pub async fn spawn_upstream() -> (String, Arc<Upstream>) {
    let upstream = Arc::new(Upstream::default());

    let app = Router::new()
        .route("/items", get(items))
        .route("/flaky", get(flaky))
        .route("/broken", get(broken))
        .route("/pages", get(pages))
        .route("/widgets", post(widgets))
        .route("/whoami", get(whoami))
        .route("/empty", get(empty))
        .route("/html", get(not_json))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), upstream)
}
