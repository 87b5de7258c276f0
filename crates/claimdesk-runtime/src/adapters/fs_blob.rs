//! # Filesystem Blob Store
//!
//! Documents live under `<data_dir>/blobs/<key>`. Download links point at the
//! gateway's `/files/*key` route and carry an HMAC signature and an expiry,
//! so they work without a bearer token for as long as they are valid.
//!
//! Writes go to a temp file in the target directory and are renamed into
//! place, so a reader never observes a partial document.

use super::signing::{SignatureRejection, UrlSigner};
use async_trait::async_trait;
use bytes::Bytes;
use cd_01_claims::{BlobStore, BlobStoreError, DocumentFormat};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const BLOB_DIR: &str = "blobs";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Blob store backed by a directory tree.
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
    signer: UrlSigner,
}

impl FsBlobStore {
    /// Create the store, making `<data_dir>/blobs` if needed.
    pub async fn open(
        data_dir: &Path,
        public_base_url: &str,
        signer: UrlSigner,
    ) -> Result<Self, BlobStoreError> {
        let root = data_dir.join(BLOB_DIR);
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| BlobStoreError::Io(format!("{}: {e}", root.display())))?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            signer,
        })
    }

    /// Resolve a key to its path, refusing anything that could escape `root`.
    fn path_for(&self, key: &str) -> Result<PathBuf, BlobStoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    /// Read a stored document.
    pub async fn read(&self, key: &str) -> Result<Bytes, BlobStoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BlobStoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(BlobStoreError::Io(format!("{key}: {e}"))),
        }
    }

    pub async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| BlobStoreError::Io(format!("{key}: {e}")))
    }

    /// Check a download link's signature and expiry against the current time.
    pub fn verify_link(
        &self,
        key: &str,
        expires: i64,
        signature: &str,
    ) -> Result<(), SignatureRejection> {
        self.signer
            .verify(key, expires, signature, Utc::now().timestamp())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobStoreError> {
        let path = self.path_for(key)?;
        let parent = path
            .parent()
            .ok_or_else(|| BlobStoreError::InvalidKey(key.to_string()))?;
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| BlobStoreError::Io(format!("{}: {e}", parent.display())))?;

        let temp = parent.join(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        let size = bytes.len();
        if let Err(e) = tokio::fs::write(&temp, &bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(BlobStoreError::Io(format!("{key}: {e}")));
        }
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(BlobStoreError::Io(format!("{key}: {e}")));
        }

        debug!(key, size, content_type, "Blob stored");
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, BlobStoreError> {
        if !self.exists(key).await? {
            return Err(BlobStoreError::NotFound(key.to_string()));
        }
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires = Utc::now().timestamp().saturating_add(ttl_secs);
        let signature = self.signer.sign(key, expires);
        Ok(format!(
            "{}/files/{key}?expires={expires}&signature={signature}",
            self.public_base_url
        ))
    }
}

/// Keys are relative, slash-separated paths with no `.`/`..` segments.
pub fn validate_key(key: &str) -> Result<(), BlobStoreError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(BlobStoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Content type served for a stored key, from its extension.
pub fn content_type_for_key(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let format = match extension.as_str() {
        "pdf" => Some(DocumentFormat::Pdf),
        "jpg" | "jpeg" => Some(DocumentFormat::Jpeg),
        "png" => Some(DocumentFormat::Png),
        _ => None,
    };
    format.map_or(FALLBACK_CONTENT_TYPE, DocumentFormat::mime_type)
}
