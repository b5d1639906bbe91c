use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use crate::broker::mailbox::MailboxSender;
use crate::broker::message::Message;
use crate::config::BrokerSettings;
use crate::utils::error::BrokerError;

/// Routes messages between registered users.
///
/// The broker owns one bounded inbound queue fed by arbitrarily many producers
/// and a map of per-user mailboxes. A single dispatch task drains the inbound
/// queue and fans each message out: to every registered user when the
/// broadcast flag is set, otherwise to the one named recipient. Users join and
/// leave while dispatch is running; the registration map sits behind a
/// readers-writer lock so broadcast sweeps and lookups proceed concurrently
/// while registration changes get exclusive access.
///
/// Delivery is best effort. A message addressed to an unregistered user, or to
/// a mailbox whose reader has gone away, is dropped silently; there is no
/// acknowledgment path back to the sender.
#[derive(Debug)]
pub struct Broker {
    input_tx: mpsc::Sender<Message>,
    input_rx: Mutex<Option<mpsc::Receiver<Message>>>,
    users: Arc<RwLock<HashMap<String, MailboxSender>>>,
    cancel: CancellationToken,
    done: CancellationToken,
}

impl Broker {
    /// Creates a broker governed by the given cancellation token.
    ///
    /// Cancelling the token fails pending and future `submit` calls and stops
    /// the dispatch loop once started.
    pub fn new(settings: &BrokerSettings, cancel: CancellationToken) -> Self {
        let (input_tx, input_rx) = mpsc::channel(settings.inbound_capacity.max(1));
        Self {
            input_tx,
            input_rx: Mutex::new(Some(input_rx)),
            users: Arc::new(RwLock::new(HashMap::new())),
            cancel,
            done: CancellationToken::new(),
        }
    }

    /// Starts the dispatch loop on the current runtime.
    ///
    /// Exactly one loop may ever run per broker: a second call fails with
    /// [`BrokerError::AlreadyStarted`] instead of spawning a competing
    /// consumer of the inbound queue. The loop runs until the cancellation
    /// token fires or the inbound queue closes, then signals [`Broker::stopped`].
    pub fn start(&self) -> Result<(), BrokerError> {
        let mut input = {
            let mut slot = self.input_rx.lock().unwrap();
            slot.take().ok_or(BrokerError::AlreadyStarted)?
        };

        let users = Arc::clone(&self.users);
        let cancel = self.cancel.clone();
        let done = self.done.clone();

        tokio::spawn(async move {
            tracing::info!("dispatch loop started");
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    maybe = input.recv() => match maybe {
                        Some(msg) => dispatch(&users, &cancel, msg).await,
                        None => break,
                    },
                }
            }
            tracing::info!("dispatch loop stopped");
            done.cancel();
        });

        Ok(())
    }

    /// Enqueues a message for dispatch.
    ///
    /// Waits while the inbound queue is full. Fails with
    /// [`BrokerError::Cancelled`] once the broker's cancellation token has
    /// fired, including when it fires mid-wait, without enqueuing the
    /// message, or with [`BrokerError::Closed`] if the dispatch loop has
    /// already exited. Safe to call from any number of tasks concurrently.
    pub async fn submit(&self, msg: Message) -> Result<(), BrokerError> {
        if self.cancel.is_cancelled() {
            return Err(BrokerError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(BrokerError::Cancelled),
            sent = self.input_tx.send(msg) => sent.map_err(|_| BrokerError::Closed),
        }
    }

    /// Registers a user's mailbox under the given id.
    ///
    /// Last registration wins: re-registering an id replaces the previous
    /// mailbox handle, and dropping that handle closes the displaced mailbox
    /// so its reader observes end-of-stream rather than waiting forever.
    pub async fn register_user(&self, id: impl Into<String>, mailbox: MailboxSender) {
        let id = id.into();
        let mut users = self.users.write().await;
        if users.insert(id.clone(), mailbox).is_some() {
            tracing::debug!(user = %id, "registration replaced, previous mailbox closed");
        } else {
            tracing::debug!(user = %id, "registered");
        }
    }

    /// Removes a user's mailbox, closing it for further deliveries.
    ///
    /// The reader draining that mailbox sees `None` once buffered messages are
    /// consumed. Unregistering an unknown id is a no-op.
    pub async fn unregister_user(&self, id: &str) {
        let removed = {
            let mut users = self.users.write().await;
            users.remove(id)
        };
        if removed.is_some() {
            tracing::debug!(user = %id, "unregistered");
        }
    }

    /// Returns a future that completes once the dispatch loop has fully
    /// exited.
    ///
    /// The future owns its wait handle, so a supervisor can capture it and
    /// drop the broker itself; dropping the broker closes the inbound queue,
    /// which is one of the two ways the loop ends.
    pub fn stopped(&self) -> WaitForCancellationFutureOwned {
        self.done.clone().cancelled_owned()
    }

    #[cfg(test)]
    pub(crate) fn inbound_slots_free(&self) -> usize {
        self.input_tx.capacity()
    }
}

/// Fans one message out to its recipient set.
///
/// Broadcast holds the read guard for the whole sweep, so the recipient set is
/// exactly the users registered when the sweep began. Unicast releases the
/// guard before sending, so a slow recipient never blocks registration
/// changes. Every send races the cancellation token, keeping the loop
/// responsive to shutdown even when a mailbox is full.
async fn dispatch(
    users: &RwLock<HashMap<String, MailboxSender>>,
    cancel: &CancellationToken,
    msg: Message,
) {
    if msg.broadcast {
        let users = users.read().await;
        for (id, mailbox) in users.iter() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(user = %id, "delivery abandoned, shutting down");
                }
                sent = mailbox.send(msg.clone()) => {
                    if sent.is_err() {
                        tracing::debug!(user = %id, "dropped message, mailbox closed");
                    }
                }
            }
        }
    } else {
        let target = {
            let users = users.read().await;
            users.get(&msg.recipient).cloned()
        };
        let Some(mailbox) = target else {
            tracing::debug!(user = %msg.recipient, "dropped message, user not registered");
            return;
        };
        let recipient = msg.recipient.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(user = %recipient, "delivery abandoned, shutting down");
            }
            sent = mailbox.send(msg) => {
                if sent.is_err() {
                    tracing::debug!(user = %recipient, "dropped message, mailbox closed");
                }
            }
        }
    }
}
