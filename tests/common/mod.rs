//! A local stand-in for a Twitarr server.

#![allow(dead_code)]

use std::{collections::BTreeMap, net::SocketAddr};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use twitarr::{AuthConfig, TwitarrServer};

async fn thread(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "id": id,
        "subject": "Dinner plans",
        "timestamp": 1_500_000_000_000_i64,
        "users": [{"username": "demo"}, {"username": "steve", "display_name": "Steve"}],
        "messages": [{
            "id": "m1",
            "author": {"username": "steve"},
            "text": "see you at eight",
            "timestamp": "2017-07-14T02:40:00Z"
        }],
        "message_count": 1
    }))
}

async fn missing(Path(id): Path<String>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"status": "error", "error": format!("no such thread {id}")})),
    )
}

async fn unauthorized() -> impl IntoResponse {
    (StatusCode::UNAUTHORIZED, "invalid username or password")
}

async fn ping() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "pong")
}

async fn payload_error() -> Json<Value> {
    Json(json!({"status": "error", "error": "not logged in"}))
}

async fn echo(
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let header = |name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    Json(json!({
        "query": query,
        "body": body,
        "authorization": header(header::AUTHORIZATION),
        "content_type": header(header::CONTENT_TYPE),
        "requested_with": header(header::HeaderName::from_static("x-requested-with")),
    }))
}

fn app() -> Router {
    Router::new()
        .route("/api/v2/seamail/{id}", get(thread))
        .route("/api/v2/missing/{id}", get(missing))
        .route("/api/v2/login", get(unauthorized))
        .route("/api/v2/ping", get(ping))
        .route("/api/v2/payload-error", get(payload_error))
        .route("/api/v2/echo", post(echo).put(echo).delete(echo).get(echo))
}

/// Starts the server on a random port and returns its address.
pub async fn spawn() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app()).await.unwrap() });
    addr
}

/// A server reference pointing at `addr`, logged in as `demo`.
pub fn server(addr: SocketAddr) -> TwitarrServer {
    TwitarrServer::builder()
        .name("Local")
        .url(format!("http://{addr}/"))
        .unwrap()
        .auth(AuthConfig::new("demo", "demo"))
        .build()
}
