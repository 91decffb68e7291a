use std::collections::BTreeMap;
use std::convert::Infallible;

/// Key-value seam for persisting serialized snapshots.
///
/// Data is stored as opaque bytes; the store does not interpret the counter
/// structure. Backends that can fail report it through [`Self::Error`],
/// which [`Ledger::sync`](crate::Ledger::sync) surfaces as
/// [`Error::Store`](crate::Error::Store).
pub trait SnapshotStore {
    /// Error type for this backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Retrieve the snapshot stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Store `value` under `key`, replacing any previous snapshot.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error>;

    /// Delete the snapshot under `key`.
    fn delete(&mut self, key: &str) -> Result<(), Self::Error>;

    /// Check if a snapshot exists under `key`.
    fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-memory snapshot store.
///
/// Nothing touches disk. Ideal for tests and for replicas sharing a process.
///
/// # Example
///
/// ```
/// use tgcounter::{MemoryStore, SnapshotStore};
///
/// let mut store = MemoryStore::new();
/// store.put("player_1", b"{}").unwrap();
/// assert_eq!(store.get("player_1").unwrap().as_deref(), Some(b"{}".as_slice()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        self.entries.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.entries.contains_key(key))
    }
}
