use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use discogs2spotify::server::start_callback_server;
use discogs2spotify::types::PkceToken;

fn pending(state: &str) -> Arc<Mutex<Option<PkceToken>>> {
    Arc::new(Mutex::new(Some(PkceToken {
        code_verifier: "verifier".to_string(),
        state: state.to_string(),
        code: None,
    })))
}

// Finds a free local port for the server to bind
async fn free_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().to_string()
}

#[tokio::test]
async fn test_callback_stores_code() {
    let addr = free_address().await;
    let shared = pending("expected-state");
    let server = start_callback_server(&addr, "/callback", Arc::clone(&shared))
        .await
        .unwrap();

    let body = reqwest::get(format!(
        "http://{}/callback?code=the-code&state=expected-state",
        addr
    ))
    .await
    .unwrap()
    .text()
    .await
    .unwrap();

    assert!(body.contains("Authorization received"));
    let code = shared.lock().await.as_ref().and_then(|p| p.code.clone());
    assert_eq!(code.as_deref(), Some("the-code"));

    server.abort();
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let addr = free_address().await;
    let shared = pending("expected-state");
    let server = start_callback_server(&addr, "/callback", Arc::clone(&shared))
        .await
        .unwrap();

    let body = reqwest::get(format!(
        "http://{}/callback?code=the-code&state=forged",
        addr
    ))
    .await
    .unwrap()
    .text()
    .await
    .unwrap();

    assert!(body.contains("State mismatch"));
    assert!(shared.lock().await.as_ref().unwrap().code.is_none());

    server.abort();
}

#[tokio::test]
async fn test_callback_denied() {
    let addr = free_address().await;
    let shared = pending("expected-state");
    let server = start_callback_server(&addr, "/callback", Arc::clone(&shared))
        .await
        .unwrap();

    let body = reqwest::get(format!(
        "http://{}/callback?error=access_denied&state=expected-state",
        addr
    ))
    .await
    .unwrap()
    .text()
    .await
    .unwrap();

    assert!(body.contains("Authorization denied"));
    assert!(shared.lock().await.as_ref().unwrap().code.is_none());

    server.abort();
}

#[tokio::test]
async fn test_custom_callback_path_and_health() {
    let addr = free_address().await;
    let shared = pending("s");
    let server = start_callback_server(&addr, "/spotify/redirect", Arc::clone(&shared))
        .await
        .unwrap();

    let health: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["waiting_for_code"], true);

    reqwest::get(format!("http://{}/spotify/redirect?code=c&state=s", addr))
        .await
        .unwrap();

    let health: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["waiting_for_code"], false);

    server.abort();
}

#[tokio::test]
async fn test_bind_failure_is_returned() {
    // Keep the port busy
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let result = start_callback_server(&addr, "/callback", pending("s")).await;
    assert!(result.is_err());
}
