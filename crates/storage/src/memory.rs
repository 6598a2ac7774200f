//! In-memory storage backend.
//!
//! Provides thread-safe concurrent access via RwLock, ordered key-value
//! storage with range queries, and transactions whose compare-and-set
//! expectations are validated under the write lock at commit time. Two
//! transactions racing on the same guarded key commit exactly one.

use std::{collections::BTreeMap, ops::RangeBounds, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::backend::{KeyValue, StorageBackend, StorageError, StorageResult, Transaction};

type Store = Arc<RwLock<BTreeMap<Vec<u8>, Bytes>>>;

/// In-memory storage backend (data lost on restart)
#[derive(Clone, Default)]
pub struct MemoryBackend {
    store: Store,
}

impl MemoryBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        self.store.write().await.insert(key, Bytes::from(value));
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn get_range<R>(&self, range: R) -> StorageResult<Vec<KeyValue>>
    where
        R: RangeBounds<Vec<u8>> + Send,
    {
        let store = self.store.read().await;
        Ok(store
            .range(range)
            .map(|(k, v)| KeyValue { key: Bytes::from(k.clone()), value: v.clone() })
            .collect())
    }

    async fn compare_and_set(
        &self,
        key: &[u8],
        expected: Option<&[u8]>,
        new_value: Vec<u8>,
    ) -> StorageResult<()> {
        let mut store = self.store.write().await;
        let current = store.get(key).map(|b| b.as_ref());
        if current != expected {
            return Err(StorageError::conflict(key));
        }
        store.insert(key.to_vec(), Bytes::from(new_value));
        Ok(())
    }

    async fn transaction(&self) -> StorageResult<Box<dyn Transaction>> {
        Ok(Box::new(MemoryTransaction { store: Arc::clone(&self.store), writes: Vec::new() }))
    }

    async fn health_check(&self) -> StorageResult<()> {
        // Nothing can fail in-process; confirm the lock is takeable
        let _ = self.store.read().await;
        Ok(())
    }
}

/// A staged write operation
#[derive(Debug, Clone)]
enum WriteOp {
    Set { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
    CompareAndSet { key: Vec<u8>, expected: Option<Vec<u8>>, new_value: Vec<u8> },
}

/// A transaction over [`MemoryBackend`]
///
/// Reads observe staged writes first (read-your-writes), then the shared
/// map. Commit takes the write lock once: it validates every staged
/// compare-and-set against the current map, and only if all hold does it
/// apply the operations, in staging order, before releasing the lock.
struct MemoryTransaction {
    store: Store,
    writes: Vec<WriteOp>,
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        for write in self.writes.iter().rev() {
            match write {
                WriteOp::Set { key: k, value }
                | WriteOp::CompareAndSet { key: k, new_value: value, .. }
                    if k.as_slice() == key =>
                {
                    return Ok(Some(Bytes::from(value.clone())));
                },
                WriteOp::Delete { key: k } if k.as_slice() == key => {
                    return Ok(None);
                },
                _ => {},
            }
        }
        Ok(self.store.read().await.get(key).cloned())
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.writes.push(WriteOp::Set { key, value });
    }

    fn delete(&mut self, key: Vec<u8>) {
        self.writes.push(WriteOp::Delete { key });
    }

    fn compare_and_set(
        &mut self,
        key: Vec<u8>,
        expected: Option<Vec<u8>>,
        new_value: Vec<u8>,
    ) -> StorageResult<()> {
        self.writes.push(WriteOp::CompareAndSet { key, expected, new_value });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        let mut store = self.store.write().await;

        // Validate every CAS expectation before applying anything
        for write in &self.writes {
            if let WriteOp::CompareAndSet { key, expected, .. } = write {
                let current = store.get(key).map(|b| b.as_ref());
                if current != expected.as_deref() {
                    return Err(StorageError::conflict(key.clone()));
                }
            }
        }

        for write in self.writes {
            match write {
                WriteOp::Set { key, value }
                | WriteOp::CompareAndSet { key, new_value: value, .. } => {
                    store.insert(key, Bytes::from(value));
                },
                WriteOp::Delete { key } => {
                    store.remove(&key);
                },
            }
        }

        Ok(())
    }
}
