//! # Production Adapters
//!
//! Implementations of the subsystems' outbound ports used by the binary.
//!
//! - `fs_blob`: `FsBlobStore`, documents on the local filesystem
//! - `signing`: HMAC signatures for download links
//! - `files`: the `/files/*key` route serving signed links
//! - `mail`, `templates`: transactional email over HTTP
//! - `snapshot`: JSON-file-backed claim and account stores

pub mod files;
pub mod fs_blob;
pub mod mail;
pub mod signing;
pub mod snapshot;
pub mod templates;

pub use files::files_router;
pub use fs_blob::FsBlobStore;
pub use mail::{HttpMailNotifier, MailSetupError};
pub use signing::{SignatureRejection, UrlSigner};
pub use snapshot::{SnapshotAccountRepository, SnapshotClaimRepository, SnapshotError};
pub use templates::{MailTemplates, RenderedEmail};
