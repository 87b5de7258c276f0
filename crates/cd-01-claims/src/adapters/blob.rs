use crate::error::BlobStoreError;
use crate::ports::outbound::BlobStore;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Bytes and declared content type of one stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: String,
}

/// In-memory blob store for tests.
///
/// Counts every `put` call and can be told to reject keys under a given tag,
/// which makes the upload-failure paths of intake reachable.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
    put_calls: AtomicUsize,
    failing_prefix: RwLock<Option<String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every upload whose key starts with `prefix`.
    pub fn fail_uploads_with_prefix(&self, prefix: impl Into<String>) {
        *self.failing_prefix.write() = Some(prefix.into());
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        self.blobs.read().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.blobs.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobStoreError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(prefix) = self.failing_prefix.read().as_deref() {
            if key.starts_with(prefix) {
                return Err(BlobStoreError::Rejected(format!("injected failure for {key}")));
            }
        }
        self.blobs.write().insert(
            key.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, BlobStoreError> {
        if !self.blobs.read().contains_key(key) {
            return Err(BlobStoreError::NotFound(key.to_string()));
        }
        Ok(format!("memory://blobs/{key}?ttl={}", ttl.as_secs()))
    }
}
