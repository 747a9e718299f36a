//! blobcask: permission-gated blob storage over a shared directory tree.
//!
//! A small CRUD surface over binary blobs, each named by an opaque
//! [`BlobId`] and stored as a single file under one configured root.
//! Every operation is gated on an access rule check against the root
//! directory and returns an [`OperationOutcome`] that separates
//! domain-expected failures (denied, duplicate, not found) from fatal
//! faults (cancellation, unexpected I/O).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blobcask::{BlobId, BlobStore, CaskConfig, ContentSource, HostAcl};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), blobcask::CaskError> {
//! let config = CaskConfig::with_root("/srv/share/blobcask");
//! let store = BlobStore::new(config, Arc::new(HostAcl));
//! let cancel = CancellationToken::new();
//!
//! // Store content under a fresh id
//! let id = BlobId::new();
//! let outcome = store
//!     .store(&id, ContentSource::from_bytes(b"Hello, World!".to_vec()), &cancel)
//!     .await?;
//! assert!(outcome.succeeded());
//!
//! // Read it back
//! if let Some(bytes) = store.get_bytes(&id, &cancel).await?.into_payload() {
//!     println!("got {} bytes", bytes.len());
//! }
//!
//! // Fingerprint it
//! let hash = store.get_hash(&id, &cancel).await?;
//! println!("sha256: {}", hash.payload().map(String::as_str).unwrap_or(""));
//! # Ok(())
//! # }
//! ```
//!
//! # Shared storage
//!
//! The root may live on a shared file location (NFS, SMB/UNC). There is no
//! persisted index; existence is always recomputed by scanning the root's
//! immediate file names for the id's canonical form. Concurrent writers
//! race at the check-then-act boundary, except that store() creates files
//! exclusively so duplicate ids are refused rather than overwritten.

pub mod access;
pub mod config;
pub mod content;
pub mod digest;
pub mod id;
pub mod outcome;
pub mod store;

// Re-exports for convenience
#[cfg(unix)]
pub use access::HostAcl;
pub use access::{AccessRight, AccessRule, AclError, DirectoryAcl, RuleEffect, StaticAcl};
pub use config::CaskConfig;
pub use content::{bytes_equal, ContentSource};
pub use id::{BlobId, IdError};
pub use outcome::{ErrorKind, OperationError, OperationOutcome};
pub use store::{BlobStore, CaskError};
