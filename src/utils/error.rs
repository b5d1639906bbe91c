//! Error types for the broker and the user directory.
//!
//! Two enums cover the fallible surface:
//!
//! - [`BrokerError`]: lifecycle and submission failures on the broker.
//! - [`DirectoryError`]: validation and state-precondition failures on the
//!   user directory.
//!
//! None of these are fatal; every failed call leaves shared state exactly as
//! if the call had not been attempted.

use thiserror::Error;

/// Errors produced by the broker.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BrokerError {
    /// `start` was called on a broker whose dispatch loop is already running
    /// (or has already run). A second loop would compete for the same inbound
    /// queue and double-process messages.
    #[error("broker already started")]
    AlreadyStarted,

    /// The broker's cancellation token fired before or during the operation.
    #[error("operation cancelled: broker is shutting down")]
    Cancelled,

    /// The dispatch loop has exited and the inbound queue no longer accepts
    /// messages.
    #[error("inbound queue closed")]
    Closed,
}

impl BrokerError {
    /// Short stable label for logs.
    ///
    /// # Example
    /// ```
    /// use chatrelay::utils::BrokerError;
    ///
    /// assert_eq!(BrokerError::Cancelled.as_label(), "broker_cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BrokerError::AlreadyStarted => "broker_already_started",
            BrokerError::Cancelled => "broker_cancelled",
            BrokerError::Closed => "broker_closed",
        }
    }
}

/// Errors produced by the user directory.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DirectoryError {
    /// A profile field failed validation; the reason names the field.
    #[error("invalid profile: {reason}")]
    InvalidProfile {
        /// What was wrong with the profile.
        reason: String,
    },

    /// A profile with the same id already exists. The existing profile is
    /// never overwritten.
    #[error("user already exists")]
    DuplicateUser,

    /// No profile with the given id exists.
    #[error("user not found")]
    UserNotFound,

    /// The caller-supplied cancellation token had already fired.
    #[error("operation cancelled")]
    Cancelled,
}

impl DirectoryError {
    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DirectoryError::InvalidProfile { .. } => "invalid_profile",
            DirectoryError::DuplicateUser => "duplicate_user",
            DirectoryError::UserNotFound => "user_not_found",
            DirectoryError::Cancelled => "directory_cancelled",
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        DirectoryError::InvalidProfile {
            reason: reason.into(),
        }
    }
}
