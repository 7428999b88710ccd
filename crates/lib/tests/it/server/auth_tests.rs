use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

use crate::helpers::*;

#[tokio::test]
async fn test_register_sets_session_cookie() {
    let ts = TestServer::start().await;

    let response = ts.register("username1", "Full Name", "password2").await;
    let header = session_cookie_header(&response).expect("missing session cookie");
    assert!(header.contains("HttpOnly"), "{header}");
    assert!(header.contains("Path=/item"), "{header}");
    assert!(header.contains("Max-Age=1800"), "{header}");

    let token = session_cookie(&response).unwrap();
    assert_eq!(token.len(), 40);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(assert_success(response).await, json!({"status": 0}));

    // the new session is immediately usable
    assert!(ts.list(&token).await.is_empty());
    ts.shutdown().await;
}

#[tokio::test]
async fn test_register_failures() {
    let ts = TestServer::start().await;
    ts.register_session("username1").await;

    let cases = [
        json!({"username": "username1", "fullname": "", "password": "password1"}),
        json!({"username": "legal", "password": "legalPassword"}),
        json!({"username": "", "fullname": "Full Name", "password": "password1"}),
        json!({"username": "username", "fullname": "Full Name", "password": ""}),
    ];
    for body in cases {
        let response = ts
            .client
            .post(ts.url("/register"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert!(session_cookie(&response).is_none(), "{body}");
        assert_failure(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    }

    let health: Value = ts
        .client
        .get(ts.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["users"], 1);
    ts.shutdown().await;
}

#[tokio::test]
async fn test_register_rejects_unreadable_body() {
    let ts = TestServer::start().await;
    let response = ts
        .client
        .post(ts.url("/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_failure(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    ts.shutdown().await;
}

#[tokio::test]
async fn test_login_outcomes() {
    let ts = TestServer::start().await;
    let response = ts.register("username1", "Full Name", "pasSwd1").await;
    let registered = session_cookie(&response).unwrap();

    let response = ts.login("username1", "pasSwd1").await;
    let first = session_cookie(&response).expect("login did not set a cookie");
    assert_success(response).await;

    let response = ts.login("username1", "pasSwd1").await;
    let second = session_cookie(&response).expect("login did not set a cookie");
    assert_success(response).await;
    assert_ne!(first, second);

    let msg = assert_failure(
        ts.login("username1", "passwd1").await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    assert!(msg.starts_with("Password incorrect"), "{msg}");

    let msg = assert_failure(
        ts.login("username2", "pasSwd1").await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    assert!(msg.starts_with("Username not exists"), "{msg}");

    let response = ts
        .client
        .post(ts.url("/login"))
        .json(&json!({"password": "some_password"}))
        .send()
        .await
        .unwrap();
    let msg = assert_failure(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert!(msg.starts_with("Illegal login form"), "{msg}");

    // only the latest session survives, and the failed attempt did not kill it
    for stale in [&registered, &first] {
        let response = ts.item(Method::GET, Some(stale), None).await;
        assert_failure(response, StatusCode::BAD_REQUEST).await;
    }
    assert!(ts.list(&second).await.is_empty());
    ts.shutdown().await;
}

#[tokio::test]
async fn test_item_routes_require_session() {
    let ts = TestServer::start().await;

    let response = ts.item(Method::GET, None, None).await;
    let msg = assert_failure(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(msg, "Not logged in (possibly, your session expired).");

    let response = ts
        .item(Method::POST, Some("0000"), Some(json!({"id": 1, "value": "x"})))
        .await;
    assert_failure(response, StatusCode::BAD_REQUEST).await;
    ts.shutdown().await;
}

#[tokio::test]
async fn test_session_expires_over_http() {
    let ts = TestServer::with_timeout(Duration::from_secs(1)).await;
    let response = ts.register("shortlived", "", "pw").await;
    let header = session_cookie_header(&response).unwrap();
    assert!(header.contains("Max-Age=1"), "{header}");
    let token = session_cookie(&response).unwrap();

    assert!(ts.list(&token).await.is_empty());
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let response = ts.item(Method::GET, Some(&token), None).await;
    assert_failure(response, StatusCode::BAD_REQUEST).await;

    // logging in again opens a fresh session for the same account
    let response = ts.login("shortlived", "pw").await;
    let token = session_cookie(&response).unwrap();
    assert!(ts.list(&token).await.is_empty());
    ts.shutdown().await;
}
