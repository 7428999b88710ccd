use std::{collections::HashSet, sync::Arc, time::Duration};

use todolist::{
    Credentials, ItemCommand, OsEntropy, Registration, SessionConfig, SessionManager,
};

use crate::helpers::test_manager;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins_leave_one_session() {
    let manager = SessionManager::with_entropy(SessionConfig::default(), Arc::new(OsEntropy));
    manager
        .register(Registration::new("shared", "Shared", "pw").unwrap())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            manager
                .login(Credentials::new("shared", "pw").unwrap())
                .await
                .unwrap()
        }));
    }
    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap());
    }

    // every login got a distinct token but only one is still live
    let distinct: HashSet<_> = tokens.iter().map(|t| t.as_str().to_string()).collect();
    assert_eq!(distinct.len(), tokens.len());
    assert_eq!(manager.session_count().await, 1);

    let mut live = Vec::new();
    for token in &tokens {
        if manager.resolve(token.as_str()).await.is_some() {
            live.push(token.clone());
        }
    }
    assert_eq!(live.len(), 1);
    let user = manager.find_user("shared").await.unwrap();
    assert_eq!(user.current_session(), Some(&live[0]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_item_writes_are_serialised() {
    let manager = test_manager(Duration::from_secs(1800));
    let token = manager
        .register(Registration::new("writer", "", "pw").unwrap())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..32 {
        let manager = manager.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            manager
                .apply(
                    token.as_str(),
                    ItemCommand::Add {
                        id: None,
                        title: format!("task {i}"),
                    },
                )
                .await
                .unwrap()
                .unwrap()
                .id
        }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    // no id handed out twice
    assert_eq!(ids.len(), 32);
    let items = manager.items(token.as_str()).await.unwrap();
    assert_eq!(items.len(), 32);
    assert_eq!(items.keys().copied().max(), Some(31));
}

#[tokio::test]
async fn test_invalidate_concurrent_with_login() {
    let manager = test_manager(Duration::from_secs(1800));
    let first = manager
        .register(Registration::new("racer", "", "pw").unwrap())
        .await
        .unwrap();

    let invalidator = {
        let manager = manager.clone();
        let first = first.clone();
        tokio::spawn(async move { manager.invalidate(first.as_str()).await })
    };
    let second = manager
        .login(Credentials::new("racer", "pw").unwrap())
        .await
        .unwrap();
    invalidator.await.unwrap();

    // whichever ran first, the newer session is intact
    assert!(manager.resolve(first.as_str()).await.is_none());
    let user = manager.resolve(second.as_str()).await.unwrap();
    assert_eq!(user.current_session(), Some(&second));
}
