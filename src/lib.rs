//! # chatrelay
//!
//! `chatrelay` is an in-memory, real-time chat routing core. It accepts short
//! text messages from many concurrent producers and routes each one either to
//! a single named recipient or to every currently-registered user (broadcast).
//! It exposes no network surface of its own: a transport layer registers
//! users, relays submissions, and drains mailboxes to the wire.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `broker`: The central component that routes submitted messages into per-user mailboxes.
//! - `directory`: The validated, concurrent record of known chat participants.
//! - `history`: The append-only, in-memory log of message activity, queryable by sender.
//! - `config`: Handles loading and merging application configuration.
//! - `utils`: Contains shared utilities: error types and logging setup.
//!
//! ## Shutdown
//!
//! Every blocking operation in the broker races a shared
//! [`CancellationToken`](tokio_util::sync::CancellationToken): cancelling it
//! fails pending `submit` calls, stops the dispatch loop, and lets a
//! supervisor await full shutdown via [`broker::Broker::stopped`].

pub mod broker;
pub mod config;
pub mod directory;
pub mod history;
pub mod utils;
