//! BlobId: the opaque unique identifier naming one stored blob.
//!
//! Ids are externally supplied (callers mint them with [`BlobId::new`] or
//! parse them from strings) and their canonical form is embedded literally
//! in the on-disk file name under the cask root.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A globally unique, immutable blob identifier (128-bit UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(Uuid);

/// Errors that can occur when parsing blob ids.
#[derive(Debug, Error)]
pub enum IdError {
    #[error("invalid blob id: {0}")]
    Invalid(#[from] uuid::Error),
}

impl BlobId {
    /// Mint a new random (v4) id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Canonical string form: hyphenated lowercase hex.
    ///
    /// This exact string appears in the stored file's name, and existence
    /// scans match on it.
    pub fn canonical(&self) -> String {
        self.0.to_string()
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BlobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BlobId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
