use reqwest::{Method, StatusCode};
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn test_item_lifecycle() {
    let ts = TestServer::start().await;
    let session = ts.register_session("username1").await;
    let s = Some(session.as_str());
    let failure = StatusCode::INTERNAL_SERVER_ERROR;

    // rejected requests leave the list alone
    assert_failure(
        ts.item(Method::POST, s, Some(json!({"id": -1, "value": "my todo0"}))).await,
        failure,
    )
    .await;
    assert_failure(
        ts.item(
            Method::PUT,
            s,
            Some(json!({"id": 30, "value": "new value", "status": 1})),
        )
        .await,
        failure,
    )
    .await;
    assert_failure(ts.item(Method::DELETE, s, Some(json!({"id": -2}))).await, failure).await;
    assert!(ts.list(&session).await.is_empty());

    // add at an explicit id
    assert_eq!(
        assert_success(ts.item(Method::POST, s, Some(json!({"id": 12, "value": "my todo0"}))).await)
            .await,
        json!({"status": 0})
    );
    let items = ts.list(&session).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items["12"], json!({"id": 12, "title": "my todo0", "completed": false}));

    // an occupied id is refused without touching the item
    let msg = assert_failure(
        ts.item(Method::POST, s, Some(json!({"id": 12, "value": "failed attempt"}))).await,
        failure,
    )
    .await;
    assert!(msg.contains("already exists"), "{msg}");
    assert_eq!(ts.list(&session).await["12"]["title"], "my todo0");

    assert_success(ts.item(Method::DELETE, s, Some(json!({"id": 12}))).await).await;
    assert!(ts.list(&session).await.is_empty());

    // update replaces title and status
    assert_success(ts.item(Method::POST, s, Some(json!({"id": 17, "value": "old value"}))).await)
        .await;
    assert_success(
        ts.item(
            Method::PUT,
            s,
            Some(json!({"id": 17, "value": "new value", "status": 1})),
        )
        .await,
    )
    .await;
    assert_eq!(
        ts.list(&session).await["17"],
        json!({"id": 17, "title": "new value", "completed": true})
    );

    // id -1 on DELETE removes every completed item
    assert_success(ts.item(Method::DELETE, s, Some(json!({"id": -1}))).await).await;
    assert!(ts.list(&session).await.is_empty());

    // id -1 on PUT marks everything, later adds start open
    assert_success(ts.item(Method::POST, s, Some(json!({"id": 17, "value": "item17"}))).await)
        .await;
    assert_success(ts.item(Method::PUT, s, Some(json!({"id": -1, "status": 1}))).await).await;
    assert_success(ts.item(Method::POST, s, Some(json!({"id": 1, "value": "item1"}))).await).await;
    let items = ts.list(&session).await;
    assert_eq!(items["17"]["completed"], true);
    assert_eq!(items["1"]["completed"], false);

    assert_success(ts.item(Method::DELETE, s, Some(json!({"id": -1}))).await).await;
    assert_success(ts.item(Method::DELETE, s, Some(json!({"id": 1}))).await).await;
    assert!(ts.list(&session).await.is_empty());

    // deleting again names a missing id
    assert_failure(ts.item(Method::DELETE, s, Some(json!({"id": 1}))).await, failure).await;
    ts.shutdown().await;
}

#[tokio::test]
async fn test_auto_assigned_ids_are_reported() {
    let ts = TestServer::start().await;
    let session = ts.register_session("shopper").await;
    let s = Some(session.as_str());

    let mut assigned = Vec::new();
    for title in ["milk", "eggs", "bread"] {
        let body =
            assert_success(ts.item(Method::POST, s, Some(json!({"value": title}))).await).await;
        assigned.push(body["id"].as_u64().expect("auto-assigned id missing"));
    }
    assert_eq!(assigned, vec![0, 1, 2]);

    // removing the newest does not free its id for reuse
    assert_success(ts.item(Method::DELETE, s, Some(json!({"id": 2}))).await).await;
    let body = assert_success(ts.item(Method::POST, s, Some(json!({"value": "jam"}))).await).await;
    assert_eq!(body["id"], 3);

    // updates need an integer id, a numeric string is refused
    assert_failure(
        ts.item(
            Method::PUT,
            s,
            Some(json!({"id": "0", "value": "oat milk", "status": 0})),
        )
        .await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    assert_eq!(ts.list(&session).await["0"]["title"], "milk");
    assert_success(
        ts.item(
            Method::PUT,
            s,
            Some(json!({"id": 0, "value": "oat milk", "status": 0})),
        )
        .await,
    )
    .await;

    // removal still takes a numeric string
    assert_success(ts.item(Method::DELETE, s, Some(json!({"id": "3"}))).await).await;
    let items = ts.list(&session).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items["0"]["title"], "oat milk");
    assert_eq!(
        items.keys().cloned().collect::<Vec<_>>(),
        vec!["0".to_string(), "1".to_string()]
    );
    ts.shutdown().await;
}

#[tokio::test]
async fn test_invalid_update_requests() {
    let ts = TestServer::start().await;
    let session = ts.register_session("strict").await;
    let s = Some(session.as_str());
    let failure = StatusCode::INTERNAL_SERVER_ERROR;

    assert_success(ts.item(Method::POST, s, Some(json!({"id": 5, "value": "keep"}))).await).await;

    let bad = [
        json!({"id": 5, "value": "x", "status": 2}),
        json!({"id": 5, "value": "x"}),
        json!({"id": 5, "status": 1}),
        json!({"id": "five", "value": "x", "status": 1}),
        json!({"value": "x", "status": 1}),
    ];
    for body in bad {
        assert_failure(ts.item(Method::PUT, s, Some(body)).await, failure).await;
    }
    // a body that is not JSON at all
    assert_failure(ts.item(Method::PUT, s, None).await, failure).await;

    assert_eq!(
        ts.list(&session).await["5"],
        json!({"id": 5, "title": "keep", "completed": false})
    );
    ts.shutdown().await;
}

#[tokio::test]
async fn test_users_see_only_their_items() {
    let ts = TestServer::start().await;
    let alice = ts.register_session("alice").await;
    let bob = ts.register_session("bob").await;

    assert_success(
        ts.item(Method::POST, Some(&alice), Some(json!({"id": 1, "value": "alice's"})))
            .await,
    )
    .await;
    assert_success(
        ts.item(Method::POST, Some(&bob), Some(json!({"id": 1, "value": "bob's"})))
            .await,
    )
    .await;

    assert_eq!(ts.list(&alice).await["1"]["title"], "alice's");
    assert_eq!(ts.list(&bob).await["1"]["title"], "bob's");

    // items survive a re-login
    let response = ts.login("alice", "password").await;
    let alice = session_cookie(&response).unwrap();
    assert_eq!(ts.list(&alice).await.len(), 1);
    ts.shutdown().await;
}
