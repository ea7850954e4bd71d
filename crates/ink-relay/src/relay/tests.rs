//! State machine tests: create, attach, submit, close.

use std::collections::HashSet;
use std::time::Duration;

use super::*;
use crate::eviction::UnattachedTtl;
use crate::protocol::decode;

async fn recv_payload(attachment: &mut ViewerAttachment) -> Payload {
    let frame = tokio::time::timeout(Duration::from_secs(1), attachment.outbound.recv())
        .await
        .expect("timed out waiting for frame")
        .expect("viewer queue closed");
    decode(&frame).expect("frame is a valid envelope")
}

#[tokio::test]
async fn create_then_lookup_finds_session() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();

    let session = relay.sessions().get(&token).await.unwrap();
    assert_eq!(session.owner_id(), "cust-1");
    assert_eq!(session.phase(), Phase::Created);
}

#[tokio::test]
async fn closed_token_misses_permanently() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();

    assert!(relay.close(&token).await);
    assert!(relay.sessions().get(&token).await.is_none());
    assert!(!relay.close(&token).await);

    assert_eq!(
        relay.attach(&token).await.unwrap_err(),
        RelayError::TokenExpired
    );
    assert_eq!(
        relay.submit(&token, Payload::message("x")).await,
        Err(RelayError::TokenExpired)
    );
    assert!(relay.phase(&token).await.is_none());
}

#[tokio::test]
async fn submit_before_attach_is_not_attached() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();

    let result = relay.submit(&token, Payload::Image(vec![1, 2, 3])).await;
    assert_eq!(result, Err(RelayError::NotAttached));
    // Still usable afterwards
    assert_eq!(relay.phase(&token).await, Some(Phase::Created));
}

#[tokio::test]
async fn attach_unknown_token_is_expired() {
    let relay = Relay::default();
    let err = relay.attach(&Token::from("tok-B")).await.unwrap_err();
    assert_eq!(err, RelayError::TokenExpired);
}

#[tokio::test]
async fn second_attach_is_rejected() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();
    let _viewer = relay.attach(&token).await.unwrap();

    let err = relay.attach(&token).await.unwrap_err();
    assert_eq!(err, RelayError::AlreadyAttached);
}

#[tokio::test]
async fn image_reaches_viewer_unmodified() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();
    let mut viewer = relay.attach(&token).await.unwrap();

    let bytes = vec![0x89, b'P', b'N', b'G', 0, 255, 10];
    relay
        .submit(&token, Payload::Image(bytes.clone()))
        .await
        .unwrap();

    assert_eq!(recv_payload(&mut viewer).await, Payload::Image(bytes));
    assert!(viewer.outbound.try_recv().is_err());
}

#[tokio::test]
async fn sequential_submissions_arrive_in_order() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();
    let mut viewer = relay.attach(&token).await.unwrap();

    for i in 0..20u8 {
        relay.submit(&token, Payload::Image(vec![i])).await.unwrap();
    }
    for i in 0..20u8 {
        assert_eq!(recv_payload(&mut viewer).await, Payload::Image(vec![i]));
    }
}

#[tokio::test]
async fn unknown_token_leaves_other_sessions_untouched() {
    let relay = Relay::default();
    let attached = relay.create("cust-1").await.unwrap();
    let pending = relay.create("cust-2").await.unwrap();
    let mut viewer = relay.attach(&attached).await.unwrap();

    let result = relay
        .submit(&Token::from("tok-B"), Payload::message("x"))
        .await;
    assert_eq!(result, Err(RelayError::TokenExpired));

    assert_eq!(relay.session_count().await, 2);
    assert_eq!(relay.phase(&attached).await, Some(Phase::Attached));
    assert_eq!(relay.phase(&pending).await, Some(Phase::Created));
    assert!(viewer.outbound.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_yield_distinct_tokens() {
    let relay = Relay::default();
    let mut handles = Vec::new();
    for i in 0..64 {
        let relay = relay.clone();
        handles.push(tokio::spawn(async move {
            relay.create(&format!("cust-{i}")).await.unwrap()
        }));
    }

    let mut tokens = HashSet::new();
    for handle in handles {
        tokens.insert(handle.await.unwrap());
    }
    assert_eq!(tokens.len(), 64);
    assert_eq!(relay.session_count().await, 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_each_arrive_once() {
    let relay = Relay::new(512);
    let token = relay.create("cust-1").await.unwrap();
    let mut viewer = relay.attach(&token).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..100u8 {
        let relay = relay.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            relay.submit(&token, Payload::Image(vec![i])).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut seen = HashSet::new();
    for _ in 0..100 {
        match recv_payload(&mut viewer).await {
            Payload::Image(bytes) => assert!(seen.insert(bytes)),
            other => panic!("unexpected payload {other:?}"),
        }
    }
    assert_eq!(seen.len(), 100);
}

#[tokio::test]
async fn close_ends_viewer_queue() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();
    let mut viewer = relay.attach(&token).await.unwrap();

    relay.close(&token).await;
    assert!(viewer.outbound.recv().await.is_none());
}

#[tokio::test]
async fn submit_after_viewer_dropped_is_delivery_failure() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();
    let viewer = relay.attach(&token).await.unwrap();
    drop(viewer);

    let result = relay.submit(&token, Payload::message("hello")).await;
    assert!(matches!(result, Err(RelayError::DeliveryFailed(_))));
}

#[tokio::test]
async fn full_viewer_queue_is_delivery_failure() {
    let relay = Relay::new(1);
    let token = relay.create("cust-1").await.unwrap();
    let _viewer = relay.attach(&token).await.unwrap();

    relay.submit(&token, Payload::message("one")).await.unwrap();
    let result = relay.submit(&token, Payload::message("two")).await;
    assert!(matches!(result, Err(RelayError::DeliveryFailed(_))));
}

#[tokio::test]
async fn reap_keeps_attached_and_fresh_sessions() {
    let relay = Relay::default();
    let fresh = relay.create("cust-1").await.unwrap();
    let attached = relay.create("cust-2").await.unwrap();
    let _viewer = relay.attach(&attached).await.unwrap();

    let removed = relay
        .reap(&UnattachedTtl::new(Duration::from_secs(60)))
        .await;
    assert_eq!(removed, 0);
    assert_eq!(relay.phase(&fresh).await, Some(Phase::Created));
    assert_eq!(relay.phase(&attached).await, Some(Phase::Attached));
}

#[tokio::test(start_paused = true)]
async fn reap_removes_expired_unattached_session() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();

    tokio::time::advance(Duration::from_secs(61)).await;
    let removed = relay
        .reap(&UnattachedTtl::new(Duration::from_secs(60)))
        .await;

    assert_eq!(removed, 1);
    assert!(relay.phase(&token).await.is_none());
    assert_eq!(
        relay.submit(&token, Payload::message("late")).await,
        Err(RelayError::TokenExpired)
    );
}

#[tokio::test]
async fn pairing_scenario() {
    let relay = Relay::default();
    let token = relay.create("cust-1").await.unwrap();
    let mut viewer = relay.attach(&token).await.unwrap();

    relay
        .submit(&token, Payload::message("hello"))
        .await
        .unwrap();
    let frame = viewer.outbound.recv().await.unwrap();
    assert_eq!(frame, r#"{"type":1,"data":"hello"}"#);

    let result = relay
        .submit(&Token::from("tok-B"), Payload::message("x"))
        .await;
    assert_eq!(result, Err(RelayError::TokenExpired));
}
