//! BlobStore: permission-gated CRUD over blobs stored one file per id.
//!
//! Layout:
//! ```text
//! {root}/
//! ├── 6d58e569-6ae7-48c3-bb0f-8b41df0e9655   # raw blob bytes
//! └── 9f8b1c22-41a0-4c55-bd11-0a4f6f6f2a10
//! ```
//!
//! Every operation checks its cancellation token exactly once at entry,
//! then gates on the directory ACL before touching the tree. There is no
//! in-memory cache, lock table or session; the filesystem is the only
//! shared state. Concurrent mutations against the same id race at the
//! check-then-act boundary, except that store() uses create-exclusive so
//! a race loser gets a duplicate error rather than silently overwriting.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::access::{evaluate, AccessRight, DirectoryAcl};
use crate::config::CaskConfig;
use crate::content::ContentSource;
use crate::digest;
use crate::id::BlobId;
use crate::outcome::{ErrorKind, OperationOutcome};

const MSG_NO_RIGHTS: &str = "no rights to perform this action";
const MSG_ALREADY_EXISTS: &str = "file already exists";
const MSG_PATH_NOT_VALID: &str = "provided path is not valid";

/// Faults that abort a call outright.
///
/// Domain-expected conditions (denied, duplicate, not found) never appear
/// here; they are structured errors inside the [`OperationOutcome`].
#[derive(Debug, Error)]
pub enum CaskError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("filesystem fault: {0}")]
    Io(#[from] std::io::Error),
}

/// The content manager: CRUD plus digest over a single directory of blobs.
pub struct BlobStore {
    config: CaskConfig,
    acl: Arc<dyn DirectoryAcl>,
}

impl BlobStore {
    /// Create a store over the configured root, gated by the given ACL.
    pub fn new(config: CaskConfig, acl: Arc<dyn DirectoryAcl>) -> Self {
        Self { config, acl }
    }

    /// Create a store rooted at a specific path.
    pub fn at_root(root: impl Into<PathBuf>, acl: Arc<dyn DirectoryAcl>) -> Self {
        Self::new(CaskConfig::with_root(root), acl)
    }

    /// Get the configuration.
    pub fn config(&self) -> &CaskConfig {
        &self.config
    }

    /// The path where a blob with this id is (or would be) stored.
    pub fn blob_path(&self, id: &BlobId) -> PathBuf {
        self.config.root.join(id.canonical())
    }

    /// Fail-closed rights check against the root directory. A failed rule
    /// query is a denial, never an error.
    fn can_perform(&self, right: AccessRight) -> bool {
        match self.acl.rules_for(&self.config.root) {
            Ok(rules) => evaluate(&rules, right),
            Err(err) => {
                warn!(error = %err, ?right, "access rule query failed, denying");
                false
            }
        }
    }

    fn guard(cancel: &CancellationToken) -> Result<(), CaskError> {
        if cancel.is_cancelled() {
            return Err(CaskError::Cancelled);
        }
        Ok(())
    }

    /// Scan the root's immediate file names for one containing the id's
    /// canonical form. Returns the matching path, if any.
    async fn scan_for(&self, id: &BlobId) -> Result<Option<PathBuf>, CaskError> {
        let needle = id.canonical();

        let mut entries = match fs::read_dir(&self.config.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().contains(&needle) {
                return Ok(Some(entry.path()));
            }
        }

        Ok(None)
    }

    /// Check whether a blob with this id exists under the root.
    ///
    /// Requires read rights; denial is a structured error with no payload.
    /// With rights, the payload is true iff the root directory exists and
    /// some immediate file name contains the id's canonical form.
    pub async fn exists(
        &self,
        id: &BlobId,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome<bool>, CaskError> {
        Self::guard(cancel)?;

        if !self.can_perform(AccessRight::Read) {
            warn!(id = %id, "read denied on cask root");
            return Ok(OperationOutcome::failure(ErrorKind::AccessDenied, MSG_NO_RIGHTS));
        }

        let dir_exists = match fs::metadata(&self.config.root).await {
            Ok(meta) => meta.is_dir(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => return Err(err.into()),
        };

        let found = dir_exists && self.scan_for(id).await?.is_some();
        debug!(id = %id, found, "existence scan");

        Ok(OperationOutcome::with_payload(found))
    }

    /// Store a new blob. Fails with a duplicate error if the id already
    /// exists; the original content is left untouched.
    pub async fn store(
        &self,
        id: &BlobId,
        content: ContentSource,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, CaskError> {
        Self::guard(cancel)?;

        fs::create_dir_all(&self.config.root).await?;

        if !self.can_perform(AccessRight::Write) {
            warn!(id = %id, "write denied on cask root");
            return Ok(OperationOutcome::failure(ErrorKind::AccessDenied, MSG_NO_RIGHTS));
        }

        if self.scan_for(id).await?.is_some() {
            return Ok(OperationOutcome::failure(ErrorKind::Duplicate, MSG_ALREADY_EXISTS));
        }

        // create_new closes the scan-then-create race: a loser observes
        // AlreadyExists instead of overwriting the winner's bytes.
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.blob_path(id))
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Ok(OperationOutcome::failure(ErrorKind::Duplicate, MSG_ALREADY_EXISTS));
            }
            Err(err) => return Err(err.into()),
        };

        let mut reader = content.into_reader();
        let written = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        debug!(id = %id, written, "stored blob");

        let mut outcome = OperationOutcome::new();
        outcome.add_success_message("successfully stored file content");
        Ok(outcome)
    }

    /// Retrieve a blob's full content as bytes.
    ///
    /// A missing blob is an absent payload with no error recorded; callers
    /// distinguish "not found" from "found but empty" by payload presence.
    /// Denial from the existence check propagates as envelope errors.
    pub async fn get_bytes(
        &self,
        id: &BlobId,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome<Vec<u8>>, CaskError> {
        Self::guard(cancel)?;

        let exists = self.exists(id, cancel).await?;
        if !exists.succeeded() {
            return Ok(OperationOutcome::from_errors(exists.into_errors()));
        }

        if exists.into_payload().unwrap_or(false) {
            if let Some(path) = self.scan_for(id).await? {
                let data = fs::read(&path).await?;
                debug!(id = %id, bytes = data.len(), "read blob");
                return Ok(OperationOutcome::with_payload(data));
            }
        }

        Ok(OperationOutcome::new())
    }

    /// Retrieve a blob as a [`ContentSource`].
    ///
    /// Always yields a source: a missing blob becomes a zero-length one,
    /// never an absent payload.
    pub async fn get(
        &self,
        id: &BlobId,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome<ContentSource>, CaskError> {
        Self::guard(cancel)?;

        let bytes = self.get_bytes(id, cancel).await?;
        if !bytes.succeeded() {
            return Ok(OperationOutcome::from_errors(bytes.into_errors()));
        }

        let source = match bytes.into_payload() {
            Some(data) => ContentSource::from_bytes(data),
            None => ContentSource::empty(),
        };

        Ok(OperationOutcome::with_payload(source))
    }

    /// Overwrite an existing blob in place with new content.
    pub async fn update(
        &self,
        id: &BlobId,
        content: ContentSource,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, CaskError> {
        Self::guard(cancel)?;

        if !self.can_perform(AccessRight::Write) {
            warn!(id = %id, "write denied on cask root");
            return Ok(OperationOutcome::failure(ErrorKind::AccessDenied, MSG_NO_RIGHTS));
        }

        let Some(path) = self.scan_for(id).await? else {
            return Ok(OperationOutcome::failure(ErrorKind::NotFound, MSG_PATH_NOT_VALID));
        };

        let mut file = fs::File::create(&path).await?;
        let mut reader = content.into_reader();
        let written = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        debug!(id = %id, written, "updated blob");

        let mut outcome = OperationOutcome::new();
        outcome.add_success_message("successfully updated file content");
        Ok(outcome)
    }

    /// Delete an existing blob.
    pub async fn delete(
        &self,
        id: &BlobId,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, CaskError> {
        Self::guard(cancel)?;

        if !self.can_perform(AccessRight::Write) {
            warn!(id = %id, "write denied on cask root");
            return Ok(OperationOutcome::failure(ErrorKind::AccessDenied, MSG_NO_RIGHTS));
        }

        let Some(path) = self.scan_for(id).await? else {
            return Ok(OperationOutcome::failure(ErrorKind::NotFound, MSG_PATH_NOT_VALID));
        };

        fs::remove_file(&path).await?;
        debug!(id = %id, "deleted blob");

        let mut outcome = OperationOutcome::new();
        outcome.add_success_message("successfully removed file content");
        Ok(outcome)
    }

    /// Compute the hex-encoded SHA-256 digest of a blob's full content.
    ///
    /// An empty or missing blob yields an empty string, not a digest of
    /// zero bytes.
    pub async fn get_hash(
        &self,
        id: &BlobId,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome<String>, CaskError> {
        Self::guard(cancel)?;

        let got = self.get(id, cancel).await?;
        if !got.succeeded() {
            return Ok(OperationOutcome::from_errors(got.into_errors()));
        }

        let hash = match got.into_payload() {
            Some(source) if source.unsigned_length() > 0 => {
                digest::sha256_hex(source.into_reader()).await?
            }
            _ => String::new(),
        };

        Ok(OperationOutcome::with_payload(hash))
    }
}
