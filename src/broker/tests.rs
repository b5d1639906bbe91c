use tokio_util::sync::CancellationToken;

use super::engine::Broker;
use super::mailbox::mailbox;
use super::message::Message;
use crate::config::BrokerSettings;
use crate::utils::error::BrokerError;

fn test_settings() -> BrokerSettings {
    BrokerSettings {
        inbound_capacity: 8,
        mailbox_capacity: 8,
    }
}

#[test]
fn test_message_constructors() {
    let direct = Message::direct("alice", "bob", "hey");
    assert_eq!(direct.sender, "alice");
    assert_eq!(direct.recipient, "bob");
    assert_eq!(direct.content, "hey");
    assert!(!direct.broadcast);
    assert!(direct.timestamp > 0);

    let bcast = Message::broadcast("carol", "hi all");
    assert_eq!(bcast.sender, "carol");
    assert!(bcast.recipient.is_empty());
    assert!(bcast.broadcast);
}

#[test]
fn test_message_json_shape() {
    let msg = Message::broadcast("carol", "hi all");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["sender"], "carol");
    assert_eq!(json["content"], "hi all");
    assert_eq!(json["broadcast"], true);
}

#[tokio::test]
async fn test_broadcast_reaches_registered_users() {
    let cancel = CancellationToken::new();
    let broker = Broker::new(&test_settings(), cancel.clone());
    broker.start().unwrap();

    let (alice_tx, mut alice_rx) = mailbox(8);
    let (bob_tx, mut bob_rx) = mailbox(8);
    broker.register_user("alice", alice_tx).await;
    broker.register_user("bob", bob_tx).await;

    broker
        .submit(Message::broadcast("carol", "hi all"))
        .await
        .unwrap();

    let got = alice_rx.recv().await.unwrap();
    assert_eq!(got.sender, "carol");
    assert_eq!(got.content, "hi all");
    assert!(got.broadcast);

    let got = bob_rx.recv().await.unwrap();
    assert_eq!(got.sender, "carol");
    assert_eq!(got.content, "hi all");
    assert!(got.broadcast);

    // After bob leaves, a second broadcast reaches only alice.
    broker.unregister_user("bob").await;
    broker.submit(Message::broadcast("carol", "bye")).await.unwrap();

    let got = alice_rx.recv().await.unwrap();
    assert_eq!(got.content, "bye");
    assert!(bob_rx.recv().await.is_none());

    cancel.cancel();
    broker.stopped().await;
}

#[tokio::test]
async fn test_unicast_preserves_submission_order() {
    let cancel = CancellationToken::new();
    let broker = Broker::new(&test_settings(), cancel.clone());
    broker.start().unwrap();

    let (tx, mut rx) = mailbox(8);
    broker.register_user("dave", tx).await;

    for i in 0..5 {
        broker
            .submit(Message::direct("erin", "dave", format!("m{i}")))
            .await
            .unwrap();
    }
    for i in 0..5 {
        let got = rx.recv().await.unwrap();
        assert_eq!(got.content, format!("m{i}"));
        assert_eq!(got.sender, "erin");
    }

    cancel.cancel();
    broker.stopped().await;
}

#[tokio::test]
async fn test_unicast_to_unregistered_user_is_dropped() {
    let cancel = CancellationToken::new();
    let broker = Broker::new(&test_settings(), cancel.clone());
    broker.start().unwrap();

    let (tx, mut rx) = mailbox(8);
    broker.register_user("alice", tx).await;

    // The ghost message is processed first and silently dropped; the marker
    // broadcast behind it proves the loop kept going.
    broker
        .submit(Message::direct("alice", "ghost", "anyone there?"))
        .await
        .unwrap();
    broker.submit(Message::broadcast("alice", "marker")).await.unwrap();

    let got = rx.recv().await.unwrap();
    assert_eq!(got.content, "marker");

    cancel.cancel();
    broker.stopped().await;
}

#[tokio::test]
async fn test_submit_fails_after_cancellation() {
    let cancel = CancellationToken::new();
    let settings = BrokerSettings {
        inbound_capacity: 1,
        mailbox_capacity: 1,
    };
    let broker = Broker::new(&settings, cancel.clone());
    assert_eq!(broker.inbound_slots_free(), 1);

    cancel.cancel();
    let err = broker
        .submit(Message::broadcast("carol", "too late"))
        .await
        .unwrap_err();
    assert_eq!(err, BrokerError::Cancelled);

    // The rejected message was never enqueued.
    assert_eq!(broker.inbound_slots_free(), 1);
}

#[tokio::test]
async fn test_blocked_submit_unblocks_on_cancellation() {
    let cancel = CancellationToken::new();
    let settings = BrokerSettings {
        inbound_capacity: 1,
        mailbox_capacity: 1,
    };
    // Never started, so the inbound queue fills and stays full.
    let broker = std::sync::Arc::new(Broker::new(&settings, cancel.clone()));
    broker.submit(Message::broadcast("carol", "fill")).await.unwrap();

    let blocked = {
        let broker = broker.clone();
        tokio::spawn(async move { broker.submit(Message::broadcast("carol", "stuck")).await })
    };
    tokio::task::yield_now().await;

    cancel.cancel();
    let result = blocked.await.unwrap();
    assert_eq!(result.unwrap_err(), BrokerError::Cancelled);
}

#[tokio::test]
async fn test_double_start_is_rejected() {
    let cancel = CancellationToken::new();
    let broker = Broker::new(&test_settings(), cancel.clone());

    broker.start().unwrap();
    assert_eq!(broker.start().unwrap_err(), BrokerError::AlreadyStarted);

    cancel.cancel();
    broker.stopped().await;
}

#[tokio::test]
async fn test_unregister_twice_is_noop() {
    let cancel = CancellationToken::new();
    let broker = Broker::new(&test_settings(), cancel.clone());

    let (tx, mut rx) = mailbox(8);
    broker.register_user("alice", tx).await;
    broker.unregister_user("alice").await;
    broker.unregister_user("alice").await;
    broker.unregister_user("never-registered").await;

    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_reregistration_closes_displaced_mailbox() {
    let cancel = CancellationToken::new();
    let broker = Broker::new(&test_settings(), cancel.clone());
    broker.start().unwrap();

    let (old_tx, mut old_rx) = mailbox(8);
    let (new_tx, mut new_rx) = mailbox(8);
    broker.register_user("alice", old_tx).await;
    broker.register_user("alice", new_tx).await;

    // The displaced mailbox closes instead of hanging its reader.
    assert!(old_rx.recv().await.is_none());

    broker.submit(Message::direct("bob", "alice", "hi")).await.unwrap();
    let got = new_rx.recv().await.unwrap();
    assert_eq!(got.content, "hi");

    cancel.cancel();
    broker.stopped().await;
}

#[tokio::test]
async fn test_stopped_completes_when_inbound_closes() {
    let cancel = CancellationToken::new();
    let broker = Broker::new(&test_settings(), cancel.clone());
    broker.start().unwrap();

    let stopped = broker.stopped();
    // Dropping the broker drops the inbound sender; the loop sees the queue
    // close and exits on its own, without the token firing.
    drop(broker);
    stopped.await;
    assert!(!cancel.is_cancelled());
}

#[tokio::test]
async fn test_concurrent_producers_all_delivered() {
    let cancel = CancellationToken::new();
    let broker = std::sync::Arc::new(Broker::new(&test_settings(), cancel.clone()));
    broker.start().unwrap();

    let (tx, mut rx) = mailbox(64);
    broker.register_user("sink", tx).await;

    let mut producers = Vec::new();
    for p in 0..4 {
        let broker = broker.clone();
        producers.push(tokio::spawn(async move {
            for i in 0..10 {
                broker
                    .submit(Message::direct(format!("p{p}"), "sink", format!("{i}")))
                    .await
                    .unwrap();
            }
        }));
    }
    for producer in producers {
        producer.await.unwrap();
    }

    // Every producer's messages arrive, each in its own submission order.
    let mut next = [0usize; 4];
    for _ in 0..40 {
        let got = rx.recv().await.unwrap();
        let p: usize = got.sender[1..].parse().unwrap();
        let i: usize = got.content.parse().unwrap();
        assert_eq!(i, next[p], "out-of-order delivery for producer {p}");
        next[p] += 1;
    }

    cancel.cancel();
    broker.stopped().await;
}
