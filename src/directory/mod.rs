//! The `directory` module keeps the authoritative set of chat participants.
//!
//! Profiles are validated on insertion and stored behind a readers-writer
//! lock, so lookups run concurrently with each other while mutations are
//! exclusive.

pub mod profile;
pub mod registry;

pub use profile::UserProfile;
pub use registry::UserDirectory;
