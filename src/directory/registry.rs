use std::collections::HashMap;
use std::sync::RwLock;

use tokio_util::sync::CancellationToken;

use crate::directory::profile::UserProfile;
use crate::utils::error::DirectoryError;

/// Authoritative record of known chat participants, independent of whether
/// they are currently connected to the broker.
///
/// Lookups take the read side of the lock and run concurrently; insertions and
/// removals take the write side. No guard is ever held across a blocking wait,
/// so the plain `std` lock is sufficient here.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<String, UserProfile>>,
    cancel: Option<CancellationToken>,
}

impl UserDirectory {
    /// Creates a directory without a cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory that observes the given cancellation token:
    /// once it fires, `add_user` refuses new work.
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            cancel: Some(cancel),
        }
    }

    /// Validates and inserts a new profile.
    ///
    /// Fails with [`DirectoryError::Cancelled`] if the directory's token has
    /// fired, [`DirectoryError::InvalidProfile`] on a bad field, or
    /// [`DirectoryError::DuplicateUser`] when the id is taken; the existing
    /// profile is never overwritten. On any failure the directory is left
    /// untouched.
    pub fn add_user(&self, profile: UserProfile) -> Result<(), DirectoryError> {
        if let Some(cancel) = &self.cancel {
            if cancel.is_cancelled() {
                return Err(DirectoryError::Cancelled);
            }
        }
        profile.validate()?;

        let mut users = self.users.write().unwrap();
        if users.contains_key(&profile.id) {
            return Err(DirectoryError::DuplicateUser);
        }
        users.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Removes a profile by id, failing with [`DirectoryError::UserNotFound`]
    /// if absent.
    pub fn remove_user(&self, id: &str) -> Result<(), DirectoryError> {
        let mut users = self.users.write().unwrap();
        match users.remove(id) {
            Some(_) => Ok(()),
            None => Err(DirectoryError::UserNotFound),
        }
    }

    /// Looks up a profile by id.
    pub fn get_user(&self, id: &str) -> Result<UserProfile, DirectoryError> {
        let users = self.users.read().unwrap();
        users.get(id).cloned().ok_or(DirectoryError::UserNotFound)
    }

    /// Number of known participants.
    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
