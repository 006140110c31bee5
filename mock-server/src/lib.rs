use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;
use uuid::Uuid;

/// What `/echo` saw of the request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub request_id: Uuid,
    pub method: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Hits {
    pub echo: u64,
}

pub type Counter = Arc<AtomicU64>;

pub fn app() -> Router {
    let counter: Counter = Arc::new(AtomicU64::new(0));
    Router::new()
        .route("/echo", get(echo).post(echo))
        .route("/status/{code}", get(status))
        .route("/text", get(text))
        .route("/bytes", get(bytes))
        .route("/large", get(large))
        .route("/hits", get(hit_count))
        .with_state(counter)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    State(hits): State<Counter>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    hits.fetch_add(1, Ordering::SeqCst);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    debug!(%method, ?query, "echo");
    Json(Echo {
        request_id: Uuid::new_v4(),
        method: method.to_string(),
        query,
        content_type,
        body,
    })
}

async fn status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(json!({ "status": status.as_u16() })))
}

async fn text() -> &'static str {
    "plain text, not json"
}

/// A body that is not valid UTF-8.
async fn bytes() -> &'static [u8] {
    b"\xff\xfe{}"
}

/// Length of the string `/large` returns: past ureq's default 10 MiB read cap.
pub const LARGE_LEN: usize = 11 * 1024 * 1024;

async fn large() -> Json<Value> {
    Json(Value::String("a".repeat(LARGE_LEN)))
}

async fn hit_count(State(hits): State<Counter>) -> Json<Hits> {
    Json(Hits {
        echo: hits.load(Ordering::SeqCst),
    })
}
