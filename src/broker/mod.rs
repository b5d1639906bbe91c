//! The `broker` module is the routing core of chatrelay.
//!
//! It provides the [`Broker`], which accepts messages from many concurrent
//! producers and fans them out to per-user mailboxes, either to one named
//! recipient or to every registered user at once.

pub mod engine;
pub mod mailbox;
pub mod message;

pub use engine::Broker;
pub use mailbox::{MailboxReceiver, MailboxSender, mailbox};
pub use message::Message;

#[cfg(test)]
mod tests;
