use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A routed chat message.
///
/// Messages are created by producers at submission time and never mutated
/// afterwards; the broker clones them into each target mailbox during fan-out.
///
/// # Fields
///
/// - `sender` - User id of the sender.
/// - `recipient` - User id of the recipient; ignored when `broadcast` is set.
/// - `content` - The message text, unconstrained.
/// - `broadcast` - When true, the message goes to every registered user.
/// - `timestamp` - Unix timestamp in nanoseconds, taken at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub broadcast: bool,
    pub timestamp: i64,
}

impl Message {
    /// Creates a unicast message addressed to a single recipient.
    pub fn direct(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
            broadcast: false,
            timestamp: now_nanos(),
        }
    }

    /// Creates a broadcast message addressed to all registered users.
    pub fn broadcast(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: String::new(),
            content: content.into(),
            broadcast: true,
            timestamp: now_nanos(),
        }
    }
}

fn now_nanos() -> i64 {
    // timestamp_nanos_opt only fails for dates past 2262.
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}
