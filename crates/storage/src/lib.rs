//! # Shorthands Storage
//!
//! Key-value storage abstraction for the Shorthands service: the
//! [`StorageBackend`] and [`Transaction`] traits plus the in-memory
//! implementation used by the server and tests.

#![deny(unsafe_code)]

use std::ops::RangeBounds;

use async_trait::async_trait;
use bytes::Bytes;

pub mod backend;
pub mod memory;

pub use backend::{KeyValue, StorageBackend, StorageError, StorageResult, Transaction};
pub use memory::MemoryBackend;

/// Storage backend selection
///
/// Only the in-memory variant exists today; persistent backends plug in
/// here without touching the repositories.
#[derive(Clone)]
pub enum Backend {
    Memory(MemoryBackend),
}

impl Backend {
    /// Create an in-memory backend
    pub fn memory() -> Self {
        Backend::Memory(MemoryBackend::new())
    }
}

#[async_trait]
impl StorageBackend for Backend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        match self {
            Backend::Memory(b) => b.get(key).await,
        }
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        match self {
            Backend::Memory(b) => b.set(key, value).await,
        }
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        match self {
            Backend::Memory(b) => b.delete(key).await,
        }
    }

    async fn get_range<R>(&self, range: R) -> StorageResult<Vec<KeyValue>>
    where
        R: RangeBounds<Vec<u8>> + Send,
    {
        match self {
            Backend::Memory(b) => b.get_range(range).await,
        }
    }

    async fn compare_and_set(
        &self,
        key: &[u8],
        expected: Option<&[u8]>,
        new_value: Vec<u8>,
    ) -> StorageResult<()> {
        match self {
            Backend::Memory(b) => b.compare_and_set(key, expected, new_value).await,
        }
    }

    async fn transaction(&self) -> StorageResult<Box<dyn Transaction>> {
        match self {
            Backend::Memory(b) => b.transaction().await,
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        match self {
            Backend::Memory(b) => b.health_check().await,
        }
    }
}
