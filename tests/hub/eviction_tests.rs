//! Slow consumer tests

use std::time::Duration;

use pretty_assertions::assert_eq;

use room_chat::application::SessionConfig;

use crate::common::{connect, connect_with, eventually, room, spawn_hub};

/// Every frame the peer receives until the connection ends.
async fn drain(client: &mut crate::common::TestClient) -> Vec<String> {
    let mut seen = Vec::new();
    while let Some(frame) = tokio::time::timeout(crate::common::PATIENCE, client.peer.recv())
        .await
        .expect("connection did not end in time")
    {
        seen.push(frame.as_str().to_owned());
    }
    seen
}

fn numbered(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("m{}", i)).collect()
}

#[tokio::test]
async fn test_stalled_member_is_evicted_without_blocking_others() {
    let hub = spawn_hub(false);
    let mut a = connect(&hub, "r1").await;
    let stalled_config = SessionConfig {
        outbound_capacity: 4,
        write_timeout: Duration::from_millis(100),
        ..SessionConfig::default()
    };
    let mut b = connect_with(&hub, "r1", stalled_config, 1).await;
    let mut c = connect(&hub, "r1").await;

    // b never reads, so its transport and then its queue fill up.
    for i in 0..20 {
        assert!(a.peer.send(format!("m{}", i)));
    }

    for i in 0..20 {
        assert_eq!(c.recv().await, format!("m{}", i));
    }

    let b_id = b.tasks.id();
    let snapshot = eventually(&hub, |s| !s.contains(b_id)).await;
    assert!(snapshot.contains(a.tasks.id()));
    assert!(snapshot.contains(c.tasks.id()));

    // The blocked write hits the deadline, which releases the connection.
    b.wait_closed().await;
    let seen = drain(&mut b).await;
    assert_eq!(seen, numbered(seen.len()));
    assert!(!seen.is_empty());
}

#[tokio::test]
async fn test_evicted_member_receives_everything_queued_before_eviction() {
    let hub = spawn_hub(false);
    let config = SessionConfig {
        outbound_capacity: 2,
        write_timeout: Duration::from_secs(3600),
        ..SessionConfig::default()
    };
    let mut slow = connect_with(&hub, "r1", config, 1).await;

    // At most one frame in the transport, one in flight and two queued are
    // accepted; the rest overflow and evict the member.
    for i in 0..10 {
        hub.broadcast(room("r1"), None, format!("m{}", i).into()).await;
    }
    let slow_id = slow.tasks.id();
    eventually(&hub, |s| !s.contains(slow_id)).await;

    // A slow but live reader still gets every accepted frame, in order.
    let seen = drain(&mut slow).await;
    assert_eq!(seen, numbered(seen.len()));
    assert!(seen.len() >= 2, "queued frames were dropped: {:?}", seen);
    assert!(seen.len() <= 4, "frames accepted after eviction: {:?}", seen);

    slow.wait_closed().await;
}

#[tokio::test]
async fn test_unregister_drains_queue_before_closing() {
    let hub = spawn_hub(false);
    let config = SessionConfig {
        outbound_capacity: 8,
        ..SessionConfig::default()
    };
    let mut a = connect_with(&hub, "r1", config, 1).await;

    for i in 0..5 {
        hub.broadcast(room("r1"), None, format!("m{}", i).into()).await;
    }
    hub.unregister(a.tasks.id(), room("r1")).await;

    assert_eq!(drain(&mut a).await, numbered(5));
    a.wait_closed().await;
}

#[tokio::test]
async fn test_read_timeout_drops_idle_member() {
    let hub = spawn_hub(false);
    let config = SessionConfig {
        read_timeout: Duration::from_millis(50),
        ..SessionConfig::default()
    };
    let idle = connect_with(&hub, "r1", config, 8).await;

    idle.wait_closed().await;

    let idle_id = idle.tasks.id();
    eventually(&hub, |s| !s.contains(idle_id)).await;
}
