//! The `history` module provides the append-only message log.
//!
//! The log is memory-only by design: it is an audit trail for the running
//! process, queryable by sender after the fact, with no durability guarantees.

pub mod store;

pub use store::{LogEntry, MessageStore};
