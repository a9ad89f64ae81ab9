//! In-Memory User Directory
//!
//! Reference implementation of [`UserDirectory`] for the standalone server
//! and for tests. Uniqueness of email and username is enforced atomically
//! under a single write lock, mirroring the constraint a real host
//! directory provides.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::identity::directory::UserDirectory;
use crate::identity::entity::{LocalIdentity, NewIdentity};
use crate::shared::error::{BridgeError, Result};

#[derive(Default)]
struct DirectoryState {
    identities: HashMap<u64, LocalIdentity>,
    next_uid: u64,
    sessions: HashSet<u64>,
}

/// In-memory directory with sequential uids starting at 1.
#[derive(Default)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities (test helper).
    pub async fn len(&self) -> usize {
        self.state.read().await.identities.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether a session was established for the uid (test helper).
    pub async fn has_session(&self, uid: u64) -> bool {
        self.state.read().await.sessions.contains(&uid)
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<LocalIdentity>> {
        let state = self.state.read().await;
        Ok(state
            .identities
            .values()
            .find(|identity| identity.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<LocalIdentity>> {
        let state = self.state.read().await;
        Ok(state
            .identities
            .values()
            .find(|identity| identity.username == username)
            .cloned())
    }

    async fn create(&self, identity: NewIdentity) -> Result<LocalIdentity> {
        let mut state = self.state.write().await;

        // Uniqueness check and insert happen under the same lock.
        if state.identities.values().any(|i| i.email == identity.email) {
            return Err(BridgeError::duplicate("email"));
        }
        if state.identities.values().any(|i| i.username == identity.username) {
            return Err(BridgeError::duplicate("username"));
        }

        state.next_uid += 1;
        let uid = state.next_uid;

        let record = LocalIdentity {
            uid,
            username: identity.username,
            email: identity.email,
            enabled: identity.enabled,
            init: identity.init,
            verified_at: identity.verified_at,
            roles: identity.roles,
            created_at: Utc::now(),
        };

        state.identities.insert(uid, record.clone());
        Ok(record)
    }

    async fn establish_session(&self, uid: u64) -> Result<()> {
        let mut state = self.state.write().await;

        if !state.identities.contains_key(&uid) {
            return Err(BridgeError::internal(format!(
                "cannot establish session for unknown uid {uid}"
            )));
        }

        // Idempotent: re-establishing an existing session is a no-op.
        state.sessions.insert(uid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_sequential_uids() {
        let directory = InMemoryDirectory::new();

        let a = directory
            .create(NewIdentity::enabled("a@x.com", "a@x.com"))
            .await
            .unwrap();
        let b = directory
            .create(NewIdentity::enabled("b@x.com", "b@x.com"))
            .await
            .unwrap();

        assert_eq!(a.uid, 1);
        assert_eq!(b.uid, 2);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let directory = InMemoryDirectory::new();
        directory
            .create(NewIdentity::enabled("first", "a@x.com"))
            .await
            .unwrap();

        let err = directory
            .create(NewIdentity::enabled("second", "a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateIdentity { ref field } if field == "email"));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_username() {
        let directory = InMemoryDirectory::new();
        directory
            .create(NewIdentity::enabled("same", "a@x.com"))
            .await
            .unwrap();

        let err = directory
            .create(NewIdentity::enabled("same", "b@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateIdentity { ref field } if field == "username"));
    }

    #[tokio::test]
    async fn establish_session_is_idempotent() {
        let directory = InMemoryDirectory::new();
        let identity = directory
            .create(NewIdentity::enabled("a@x.com", "a@x.com"))
            .await
            .unwrap();

        directory.establish_session(identity.uid).await.unwrap();
        directory.establish_session(identity.uid).await.unwrap();
        assert!(directory.has_session(identity.uid).await);
    }

    #[tokio::test]
    async fn establish_session_unknown_uid_fails() {
        let directory = InMemoryDirectory::new();
        assert!(directory.establish_session(42).await.is_err());
    }
}
