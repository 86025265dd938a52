/*
[INPUT]:  Key-addressed lookups from the startup gating check
[OUTPUT]: Cached identity snapshots
[POS]:    Session layer - local identity cache
[UPDATE]: When the cache keying scheme changes
*/

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::http::Result;
use crate::session::storage::KvStorage;
use crate::session::store::USER_RECORD;
use crate::types::Identity;

/// Key-addressed identity lookup. `*` is the wildcard key matching the
/// single cached snapshot.
#[async_trait]
pub trait IdentityCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Identity>>;
}

/// Cache reading straight from the persisted `user` record
pub struct StorageCache {
    storage: Arc<dyn KvStorage>,
}

impl StorageCache {
    pub fn new(storage: Arc<dyn KvStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl IdentityCache for StorageCache {
    async fn get(&self, key: &str) -> Result<Option<Identity>> {
        if key != "*" && key != USER_RECORD {
            return Ok(None);
        }

        let Some(raw) = self.storage.get(USER_RECORD)? else {
            return Ok(None);
        };

        Ok(serde_json::from_str(&raw).ok())
    }
}

/// In-memory cache for tests
#[derive(Default)]
pub struct MemoryCache {
    identity: RwLock<Option<Identity>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: RwLock::new(Some(identity)),
        }
    }

    pub fn insert(&self, identity: Identity) {
        *self.identity.write().unwrap() = Some(identity);
    }
}

#[async_trait]
impl IdentityCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Identity>> {
        if key != "*" && key != USER_RECORD {
            return Ok(None);
        }
        Ok(self.identity.read().unwrap().clone())
    }
}
