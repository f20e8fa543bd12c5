//! Broadcast delivery tests

use pretty_assertions::assert_eq;

use crate::common::{connect, eventually, room, spawn_hub};

#[tokio::test]
async fn test_broadcast_reaches_other_members_only() {
    let hub = spawn_hub(false);
    let mut a = connect(&hub, "r1").await;
    let mut b = connect(&hub, "r1").await;
    let mut c = connect(&hub, "r1").await;

    assert!(a.peer.send("hi"));
    assert_eq!(b.recv().await, "hi");
    assert_eq!(c.recv().await, "hi");

    // A later message from c is the first thing a sees, so "hi" never came back.
    assert!(c.peer.send("next"));
    assert_eq!(a.recv().await, "next");
    assert_eq!(b.recv().await, "next");
}

#[tokio::test]
async fn test_echo_policy_includes_sender() {
    let hub = spawn_hub(true);
    let mut a = connect(&hub, "r1").await;
    let mut b = connect(&hub, "r1").await;

    assert!(a.peer.send("hi"));

    assert_eq!(a.recv().await, "hi");
    assert_eq!(b.recv().await, "hi");
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let hub = spawn_hub(false);
    let mut a = connect(&hub, "r1").await;
    let mut a2 = connect(&hub, "r1").await;
    let mut d = connect(&hub, "r2").await;
    let mut d2 = connect(&hub, "r2").await;

    assert!(a.peer.send("for r1"));
    assert_eq!(a2.recv().await, "for r1");

    assert!(d.peer.send("for r2"));
    assert_eq!(d2.recv().await, "for r2");

    // d's next frame is a2's reply, so "for r1" was never delivered to r2.
    assert!(d2.peer.send("r2 again"));
    assert_eq!(d.recv().await, "r2 again");
    assert!(a2.peer.send("r1 again"));
    assert_eq!(a.recv().await, "r1 again");

    let snapshot = eventually(&hub, |s| s.room_count() == 2).await;
    assert_eq!(snapshot.members(&room("r1")).map(<[_]>::len), Some(2));
    assert_eq!(snapshot.members(&room("r2")).map(<[_]>::len), Some(2));
}

#[tokio::test]
async fn test_per_session_order_is_preserved() {
    let hub = spawn_hub(false);
    let mut a = connect(&hub, "r1").await;
    let mut b = connect(&hub, "r1").await;

    for i in 0..50 {
        assert!(a.peer.send(format!("m{}", i)));
    }

    for i in 0..50 {
        assert_eq!(b.recv().await, format!("m{}", i));
    }
}

#[tokio::test]
async fn test_lone_member_broadcast_is_dropped() {
    let hub = spawn_hub(false);
    let mut a = connect(&hub, "r1").await;

    assert!(a.peer.send("anyone?"));

    let snapshot = eventually(&hub, |s| s.session_count() == 1).await;
    assert!(snapshot.contains(a.tasks.id()));
    assert!(a.peer.try_recv().is_none());
}

#[tokio::test]
async fn test_hub_broadcast_without_sender_reaches_everyone() {
    let hub = spawn_hub(false);
    let mut a = connect(&hub, "r1").await;
    let mut b = connect(&hub, "r1").await;

    hub.broadcast(room("r1"), None, "system notice".into()).await;

    assert_eq!(a.recv().await, "system notice");
    assert_eq!(b.recv().await, "system notice");
}
