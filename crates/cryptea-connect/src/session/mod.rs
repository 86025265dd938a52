/*
[INPUT]:  Persisted session records and identity updates
[OUTPUT]: The single source of truth for "who is logged in right now"
[POS]:    Session layer - storage, store, and cache lookups
[UPDATE]: When session persistence or broadcast semantics change
*/

pub mod cache;
pub mod storage;
pub mod store;

pub use cache::{IdentityCache, MemoryCache, StorageCache};
pub use storage::{FileStorage, KvStorage, MemoryStorage};
pub use store::{SessionStore, TOKEN_RECORD, USER_RECORD};
