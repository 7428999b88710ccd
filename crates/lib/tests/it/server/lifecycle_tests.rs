use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use todolist::{Error, ServerError, TodoServer};

use crate::helpers::*;

#[tokio::test]
async fn test_server_lifecycle() {
    let mut server = TodoServer::new(test_manager(Duration::from_secs(1800)));

    // Server should not be running initially
    assert!(!server.is_running());
    assert!(server.address().is_none());

    let addr = server.start("127.0.0.1:0").await.unwrap();
    assert!(server.is_running());
    assert_eq!(server.address(), Some(addr));
    assert_ne!(addr.port(), 0);

    server.stop().await.unwrap();
    assert!(!server.is_running());
    assert!(server.address().is_none());
}

#[tokio::test]
async fn test_double_start_error() {
    let mut server = TodoServer::new(test_manager(Duration::from_secs(1800)));
    server.start("127.0.0.1:0").await.unwrap();

    let err = server.start("127.0.0.1:0").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Server(ServerError::AlreadyRunning { .. })
    ));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_without_start() {
    let mut server = TodoServer::new(test_manager(Duration::from_secs(1800)));
    let err = server.stop().await.unwrap_err();
    assert!(matches!(err, Error::Server(ServerError::NotRunning)));
}

#[tokio::test]
async fn test_bind_failure() {
    let mut server = TodoServer::new(test_manager(Duration::from_secs(1800)));
    let err = server.start("not an address").await.unwrap_err();
    assert!(matches!(err, Error::Server(ServerError::Bind { .. })));
    assert!(!server.is_running());
}

#[tokio::test]
async fn test_health_reports_counts() {
    let ts = TestServer::start().await;
    ts.register_session("one").await;
    ts.register_session("two").await;

    let response = ts.client.get(ts.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["users"], 2);
    assert_eq!(body["sessions"], 2);
    ts.shutdown().await;
}

#[tokio::test]
async fn test_restart_reinitialises_state() {
    let mut ts = TestServer::start().await;
    let session = ts.register_session("username1").await;
    assert_success(
        ts.item(
            Method::POST,
            Some(&session),
            Some(serde_json::json!({"id": 1, "value": "gone after restart"})),
        )
        .await,
    )
    .await;

    ts.server.stop().await.unwrap();
    let addr = ts.server.start("127.0.0.1:0").await.unwrap();
    ts.base = format!("http://{addr}");

    // the old cookie and the account are both gone
    assert_failure(
        ts.item(Method::GET, Some(&session), None).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_failure(
        ts.login("username1", "password").await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    assert_eq!(ts.server.manager().user_count().await, 0);

    // the name can be registered again
    let session = ts.register_session("username1").await;
    assert!(ts.list(&session).await.is_empty());
    ts.shutdown().await;
}
