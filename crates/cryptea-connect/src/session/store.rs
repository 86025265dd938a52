/*
[INPUT]:  Durable storage and identity updates from the auth flow
[OUTPUT]: Current identity, bearer token, and change broadcasts
[POS]:    Session layer - authoritative in-memory session state
[UPDATE]: When the persisted record pair or broadcast contract changes
*/

use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use tracing::warn;

use crate::http::Result;
use crate::session::storage::KvStorage;
use crate::types::{Identity, Session};

/// Persisted record holding the serialized identity
pub const USER_RECORD: &str = "user";
/// Persisted record holding the bearer token
pub const TOKEN_RECORD: &str = "userToken";

/// Single source of truth for the authenticated identity.
///
/// Constructed once per process. Updates replace the identity snapshot
/// wholesale and are broadcast to subscribers synchronously, so code
/// awaiting an auth call never observes a stale identity afterwards.
/// Only the auth gateway and logout write the persisted session.
pub struct SessionStore {
    storage: Arc<dyn KvStorage>,
    identity: watch::Sender<Option<Identity>>,
    token: RwLock<Option<String>>,
}

impl SessionStore {
    /// Load any persisted session and build the store around it.
    ///
    /// The two records must exist together; a partial pair (token
    /// without identity or vice versa) is treated as no session and
    /// purged from storage.
    pub fn init(storage: Arc<dyn KvStorage>) -> Result<Self> {
        let session = Self::load_persisted(storage.as_ref())?;
        let (identity, token) = match session {
            Some(session) => (Some(session.identity), Some(session.token)),
            None => (None, None),
        };

        let (sender, _) = watch::channel(identity);
        Ok(Self {
            storage,
            identity: sender,
            token: RwLock::new(token),
        })
    }

    fn load_persisted(storage: &dyn KvStorage) -> Result<Option<Session>> {
        let user = storage.get(USER_RECORD)?;
        let token = storage.get(TOKEN_RECORD)?;

        match (user, token) {
            (Some(user), Some(token)) => match serde_json::from_str::<Identity>(&user) {
                Ok(identity) => Ok(Some(Session { identity, token })),
                Err(e) => {
                    warn!(error = %e, "purging undecodable persisted identity");
                    storage.remove_many(&[USER_RECORD, TOKEN_RECORD])?;
                    Ok(None)
                }
            },
            (None, None) => Ok(None),
            _ => {
                warn!("purging partial persisted session");
                storage.remove_many(&[USER_RECORD, TOKEN_RECORD])?;
                Ok(None)
            }
        }
    }

    /// Current identity snapshot, if any
    pub fn get(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    /// Replace the identity snapshot and notify every subscriber before
    /// returning
    pub fn set(&self, identity: Option<Identity>) {
        self.identity.send_replace(identity);
    }

    /// Watch identity changes; each `set` marks the channel changed
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    /// Write both session records durably, as one batch
    pub fn persist(&self, session: &Session) -> Result<()> {
        let user_json = serde_json::to_string(&session.identity)?;
        self.storage
            .put_many(&[(USER_RECORD, &user_json), (TOKEN_RECORD, &session.token)])?;
        *self.token.write().unwrap() = Some(session.token.clone());
        Ok(())
    }

    /// Drop the in-memory session and both persisted records
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_many(&[USER_RECORD, TOKEN_RECORD])?;
        *self.token.write().unwrap() = None;
        self.identity.send_replace(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStorage;

    fn identity() -> Identity {
        Identity {
            id: "1".to_string(),
            email: Some("ada@example.com".to_string()),
            username: "ada".to_string(),
            accounts: vec!["0xabc".to_string()],
            avatar_url: None,
            email_verified_at: Some(chrono::Utc::now()),
        }
    }

    fn store_with(storage: Arc<MemoryStorage>) -> SessionStore {
        SessionStore::init(storage).unwrap()
    }

    #[test]
    fn test_persist_then_reload() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));

        let session = Session {
            identity: identity(),
            token: "tok".to_string(),
        };
        store.persist(&session).unwrap();
        store.set(Some(session.identity.clone()));

        let reloaded = store_with(storage);
        assert_eq!(reloaded.token().as_deref(), Some("tok"));
        assert_eq!(reloaded.get(), Some(session.identity));
    }

    #[test]
    fn test_partial_session_is_purged() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put(TOKEN_RECORD, "orphan-token").unwrap();

        let store = store_with(Arc::clone(&storage));
        assert!(store.token().is_none());
        assert!(store.get().is_none());
        assert!(storage.get(TOKEN_RECORD).unwrap().is_none());
    }

    #[test]
    fn test_undecodable_identity_is_purged() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put(USER_RECORD, "not json").unwrap();
        storage.put(TOKEN_RECORD, "tok").unwrap();

        let store = store_with(Arc::clone(&storage));
        assert!(store.get().is_none());
        assert!(storage.get(USER_RECORD).unwrap().is_none());
    }

    #[test]
    fn test_set_broadcasts_once_per_call() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage);
        let mut receiver = store.subscribe();

        let snapshot = identity();
        store.set(Some(snapshot.clone()));
        assert!(receiver.has_changed().unwrap());
        receiver.mark_unchanged();

        // Same value again still counts as one broadcast
        store.set(Some(snapshot.clone()));
        assert!(receiver.has_changed().unwrap());
        receiver.mark_unchanged();
        assert!(!receiver.has_changed().unwrap());

        assert_eq!(store.get(), Some(snapshot));
    }

    #[test]
    fn test_clear_removes_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));

        store
            .persist(&Session {
                identity: identity(),
                token: "tok".to_string(),
            })
            .unwrap();
        store.set(Some(identity()));
        store.clear().unwrap();

        assert!(store.get().is_none());
        assert!(store.token().is_none());
        assert!(storage.get(USER_RECORD).unwrap().is_none());
        assert!(storage.get(TOKEN_RECORD).unwrap().is_none());
    }
}
