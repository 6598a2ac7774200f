use std::{backtrace::Backtrace, ops::RangeBounds};

use async_trait::async_trait;
use bytes::Bytes;
use snafu::Snafu;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Canonical error types for storage operations
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// A compare-and-set expectation did not hold at commit time
    #[snafu(display("conflict on key {}", String::from_utf8_lossy(key)))]
    Conflict { key: Vec<u8>, backtrace: Backtrace },

    /// The backend failed to serve the request
    #[snafu(display("backend error: {message}"))]
    Backend { message: String, backtrace: Backtrace },
}

impl StorageError {
    /// Create a conflict error for the given key
    pub fn conflict(key: impl Into<Vec<u8>>) -> Self {
        ConflictSnafu { key: key.into() }.build()
    }

    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        BackendSnafu { message: message.into() }.build()
    }

    /// Whether this error is a compare-and-set conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict { .. })
    }

    /// The key a compare-and-set conflict was detected on, if any
    pub fn conflict_key(&self) -> Option<&[u8]> {
        match self {
            StorageError::Conflict { key, .. } => Some(key),
            StorageError::Backend { .. } => None,
        }
    }
}

/// Key-value pair returned by range queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Bytes,
    pub value: Bytes,
}

/// Core trait for key-value storage operations
///
/// Implementations must provide ordered keys (for range queries) and
/// atomic multi-operation transactions with compare-and-set validation.
#[async_trait]
pub trait StorageBackend: Send + Sync + Clone {
    /// Get the value for a key
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>>;

    /// Set the value for a key
    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()>;

    /// Delete a key (idempotent)
    async fn delete(&self, key: &[u8]) -> StorageResult<()>;

    /// Get all key-value pairs whose keys fall in the range, in key order
    async fn get_range<R>(&self, range: R) -> StorageResult<Vec<KeyValue>>
    where
        R: RangeBounds<Vec<u8>> + Send;

    /// Atomically set `key` to `new_value` if its current value equals `expected`
    ///
    /// `expected = None` means the key must not exist.
    async fn compare_and_set(
        &self,
        key: &[u8],
        expected: Option<&[u8]>,
        new_value: Vec<u8>,
    ) -> StorageResult<()>;

    /// Begin a transaction for atomic multi-operation commits
    async fn transaction(&self) -> StorageResult<Box<dyn Transaction>>;

    /// Check that the backend is reachable and serving
    async fn health_check(&self) -> StorageResult<()>;
}

/// Trait for atomic multi-operation commits
///
/// Writes are staged locally and applied atomically on [`commit`](Transaction::commit).
/// Compare-and-set expectations are validated at commit time against the
/// then-current state; any mismatch fails the whole transaction and nothing
/// is applied.
#[async_trait]
pub trait Transaction: Send {
    /// Read a key, observing this transaction's staged writes first
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>>;

    /// Stage a set
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);

    /// Stage a delete
    fn delete(&mut self, key: Vec<u8>);

    /// Stage a compare-and-set, validated at commit time
    fn compare_and_set(
        &mut self,
        key: Vec<u8>,
        expected: Option<Vec<u8>>,
        new_value: Vec<u8>,
    ) -> StorageResult<()>;

    /// Validate all compare-and-set expectations and apply every staged
    /// operation atomically
    async fn commit(self: Box<Self>) -> StorageResult<()>;
}
