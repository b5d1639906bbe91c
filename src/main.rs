#![allow(dead_code)]
mod broker;
mod config;
mod directory;
mod history;
mod utils;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::broker::{Broker, Message, mailbox};
use crate::config::load_config;
use crate::directory::{UserDirectory, UserProfile};
use crate::history::{LogEntry, MessageStore};

/// Small in-process demo: wires the broker, directory, and log together the
/// way a transport layer would, without any network.
#[tokio::main]
async fn main() {
    let settings = load_config().expect("Failed to load configuration");
    utils::logging::init(&settings.log.level);

    let cancel = CancellationToken::new();
    let broker = Arc::new(Broker::new(&settings.broker, cancel.clone()));
    let directory = Arc::new(UserDirectory::with_cancellation(cancel.clone()));
    let store = Arc::new(MessageStore::new());

    broker.start().expect("broker already started");

    let mut readers = Vec::new();
    for id in ["alice", "bob"] {
        if let Err(e) = directory.add_user(UserProfile::new(id, id, format!("{id}@example.com"))) {
            tracing::warn!(user = %id, error = %e, "could not add user");
            continue;
        }
        let (tx, mut rx) = mailbox(settings.broker.mailbox_capacity);
        broker.register_user(id, tx).await;

        let store = Arc::clone(&store);
        readers.push(tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                tracing::info!(to = %id, from = %msg.sender, content = %msg.content, "delivered");
                store.append(LogEntry {
                    sender: msg.sender,
                    content: msg.content,
                    timestamp: msg.timestamp,
                });
            }
            tracing::info!(user = %id, "mailbox closed");
        }));
    }

    broker
        .submit(Message::broadcast("carol", "hi all"))
        .await
        .expect("submit failed");
    broker
        .submit(Message::direct("alice", "bob", "hey bob"))
        .await
        .expect("submit failed");

    // Let the dispatch loop drain before shutting down.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    broker.unregister_user("alice").await;
    broker.unregister_user("bob").await;
    cancel.cancel();
    broker.stopped().await;
    for reader in readers {
        let _ = reader.await;
    }

    tracing::info!(logged = store.len(), "demo finished");
}
