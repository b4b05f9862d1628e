//! End-to-end calls through the `reqwest` transport.

#![cfg(feature = "http-client-reqwest-0_13")]

mod common;

use http::{HeaderValue, header::ACCEPT};
use serde_json::json;
use twitarr::{
    ErrorKind, TwitarrHttpOptions, TwitarrServer,
    http::{ReqwestTransport, TwitarrHttp},
    model::{RestModel as _, SeamailThread},
};

async fn client() -> TwitarrHttp<ReqwestTransport> {
    let addr = common::spawn().await;
    TwitarrHttp::builder(ReqwestTransport::new())
        .server(common::server(addr))
        .build()
}

#[tokio::test]
async fn get_decodes_a_thread() {
    let client = client().await;
    let thread = client
        .get("api/v2/seamail/t1", None)
        .await
        .unwrap()
        .try_map(SeamailThread::from_rest)
        .unwrap();

    assert_eq!(thread.code(), 200);
    let thread = thread.into_data();
    assert_eq!(thread.id, "t1");
    assert_eq!(thread.subject, "Dinner plans");
    assert_eq!(thread.users.len(), 2);
    assert_eq!(thread.messages[0].author.username, "steve");
    assert_eq!(thread.timestamp.timestamp_millis(), 1_500_000_000_000);
}

#[tokio::test]
async fn text_responses_are_strings() {
    let client = client().await;
    let options =
        TwitarrHttpOptions::default().with_header(ACCEPT, HeaderValue::from_static("text/plain"));
    let result = client.get("api/v2/ping", Some(&options)).await.unwrap();
    assert_eq!(result.data(), &json!("pong"));
    assert_eq!(result.content_type(), Some("text/plain"));
}

#[tokio::test]
async fn requests_carry_credentials_headers_and_parameters() {
    let client = client().await;
    let options = TwitarrHttpOptions::default()
        .with_parameter("limit", "5")
        .with_data(json!({"text": "hello"}));
    let echoed = client
        .post("api/v2/echo", Some(&options))
        .await
        .unwrap()
        .into_data();

    assert_eq!(echoed["query"], json!({"limit": "5"}));
    assert_eq!(echoed["body"], json!(r#"{"text":"hello"}"#));
    assert_eq!(echoed["authorization"], json!("Basic ZGVtbzpkZW1v"));
    assert_eq!(echoed["content_type"], json!("application/json;charset=utf-8"));
    assert_eq!(echoed["requested_with"], json!("XMLHttpRequest"));
}

#[tokio::test]
async fn put_without_data_sends_the_parameters() {
    let client = client().await;
    let options = TwitarrHttpOptions::default().with_parameter("starred", "true");
    let echoed = client
        .put("api/v2/echo", Some(&options))
        .await
        .unwrap()
        .into_data();
    assert_eq!(echoed["body"], json!(r#"{"starred":"true"}"#));
}

#[tokio::test]
async fn not_found_keeps_the_payload() {
    let client = client().await;
    let err = client.get("api/v2/missing/t9", None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.code(), Some(404));
    assert_eq!(err.message(), "Request failed with status code 404");
    assert_eq!(
        err.data(),
        Some(&json!({"status": "error", "error": "no such thread t9"}))
    );
    assert!(err.options().is_some());
}

#[tokio::test]
async fn unreachable_servers_are_transport_errors() {
    let client = TwitarrHttp::builder(ReqwestTransport::new())
        .server(
            TwitarrServer::builder()
                .url("http://127.0.0.1:9/")
                .unwrap()
                .build(),
        )
        .build();
    let err = client.get("api", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.message().is_empty());
}
