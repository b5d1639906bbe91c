use tokio::sync::mpsc;

use crate::broker::message::Message;

/// Sending half of a user's mailbox, held by the broker while the user is
/// registered. Dropping the last sender closes the mailbox, which is how
/// unregistration signals the reader that no more messages will arrive.
#[derive(Debug, Clone)]
pub struct MailboxSender {
    tx: mpsc::Sender<Message>,
}

/// Receiving half of a user's mailbox, drained by that user's own reader.
#[derive(Debug)]
pub struct MailboxReceiver {
    rx: mpsc::Receiver<Message>,
}

/// Creates a bounded mailbox for one user.
///
/// Capacity is clamped to at least 1, matching the minimum the underlying
/// channel accepts.
pub fn mailbox(capacity: usize) -> (MailboxSender, MailboxReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (MailboxSender { tx }, MailboxReceiver { rx })
}

impl MailboxSender {
    /// Delivers a message, waiting while the mailbox is full.
    ///
    /// Fails only when the receiving half has been dropped; the broker treats
    /// that as a silent drop.
    pub async fn send(&self, msg: Message) -> Result<(), mpsc::error::SendError<Message>> {
        self.tx.send(msg).await
    }

    /// True once the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl MailboxReceiver {
    /// Receives the next message, or `None` once the mailbox is closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Non-blocking receive, used by readers that poll between other work.
    pub fn try_recv(&mut self) -> Result<Message, mpsc::error::TryRecvError> {
        self.rx.try_recv()
    }
}
