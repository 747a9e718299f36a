//! Directory access control: the capability the store consults before
//! every operation.
//!
//! The gate is fail closed: an operation proceeds only on an explicit
//! allow rule for the exact right with no deny rule present. No matching
//! rules means denied, and a failed rule query means denied, never an
//! error.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A right that can be requested against the cask root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRight {
    Read,
    Write,
}

/// Whether a rule grants or revokes its right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleEffect {
    Allow,
    Deny,
}

/// One entry in a directory's access rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub effect: RuleEffect,
    pub right: AccessRight,
}

impl AccessRule {
    pub fn allow(right: AccessRight) -> Self {
        Self {
            effect: RuleEffect::Allow,
            right,
        }
    }

    pub fn deny(right: AccessRight) -> Self {
        Self {
            effect: RuleEffect::Deny,
            right,
        }
    }
}

/// Errors from querying a directory's rules.
///
/// The store treats every variant as "denied"; these exist so
/// implementations can report what went wrong to logs.
#[derive(Debug, Error)]
pub enum AclError {
    #[error("failed to query access rules: {0}")]
    Query(#[from] std::io::Error),

    #[error("access rules unavailable")]
    Unavailable,
}

/// Capability trait: enumerate the access rules for a directory.
///
/// Implementations answer for the principal the process runs as; the store
/// never models identities itself.
pub trait DirectoryAcl: Send + Sync {
    fn rules_for(&self, path: &Path) -> Result<Vec<AccessRule>, AclError>;
}

/// Fail-closed evaluation over a rule list.
///
/// True iff at least one allow rule for the exact `right` and no deny rule
/// for it. An empty or non-matching list is denied.
pub fn evaluate(rules: &[AccessRule], right: AccessRight) -> bool {
    let mut allow = false;
    let mut deny = false;

    for rule in rules {
        if rule.right != right {
            continue;
        }
        match rule.effect {
            RuleEffect::Allow => allow = true,
            RuleEffect::Deny => deny = true,
        }
    }

    allow && !deny
}

/// Host ACL backed by Unix permission bits.
///
/// Maps the effective uid/gid of the current process onto the owner, group
/// or other bits of the directory's mode. Mode bits only carry grants, so
/// this source never produces deny rules; absence of a grant is already
/// denial under [`evaluate`].
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct HostAcl;

#[cfg(unix)]
impl DirectoryAcl for HostAcl {
    fn rules_for(&self, path: &Path) -> Result<Vec<AccessRule>, AclError> {
        use std::os::unix::fs::MetadataExt;

        let meta = std::fs::metadata(path)?;
        let mode = meta.mode();

        let euid = unsafe { libc::geteuid() };
        let egid = unsafe { libc::getegid() };
        let shift = if euid == meta.uid() {
            6
        } else if egid == meta.gid() {
            3
        } else {
            0
        };

        let mut rules = Vec::new();
        if (mode >> shift) & 0o4 != 0 {
            rules.push(AccessRule::allow(AccessRight::Read));
        }
        if (mode >> shift) & 0o2 != 0 {
            rules.push(AccessRule::allow(AccessRight::Write));
        }
        Ok(rules)
    }
}

/// A fixed rule list, independent of path. The configurable double for
/// tests and for embedding policies decided elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticAcl {
    rules: Vec<AccessRule>,
    fail_query: bool,
}

impl StaticAcl {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self {
            rules,
            fail_query: false,
        }
    }

    /// Grants read and write.
    pub fn allow_all() -> Self {
        Self::new(vec![
            AccessRule::allow(AccessRight::Read),
            AccessRule::allow(AccessRight::Write),
        ])
    }

    /// No rules at all, which evaluates to denied for every right.
    pub fn deny_all() -> Self {
        Self::new(Vec::new())
    }

    /// Every rule query fails, which the store must treat as denied.
    pub fn failing() -> Self {
        Self {
            rules: Vec::new(),
            fail_query: true,
        }
    }
}

impl DirectoryAcl for StaticAcl {
    fn rules_for(&self, _path: &Path) -> Result<Vec<AccessRule>, AclError> {
        if self.fail_query {
            return Err(AclError::Unavailable);
        }
        Ok(self.rules.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rules_is_denied() {
        assert!(!evaluate(&[], AccessRight::Read));
    }

    #[test]
    fn test_explicit_allow_is_granted() {
        let rules = [AccessRule::allow(AccessRight::Read)];
        assert!(evaluate(&rules, AccessRight::Read));
    }

    #[test]
    fn test_allow_for_other_right_does_not_grant() {
        let rules = [AccessRule::allow(AccessRight::Read)];
        assert!(!evaluate(&rules, AccessRight::Write));
    }

    #[test]
    fn test_deny_overrides_allow() {
        let rules = [
            AccessRule::allow(AccessRight::Write),
            AccessRule::deny(AccessRight::Write),
        ];
        assert!(!evaluate(&rules, AccessRight::Write));
    }

    #[test]
    fn test_deny_alone_is_denied() {
        let rules = [AccessRule::deny(AccessRight::Read)];
        assert!(!evaluate(&rules, AccessRight::Read));
    }

    #[test]
    fn test_deny_for_other_right_does_not_block() {
        let rules = [
            AccessRule::allow(AccessRight::Read),
            AccessRule::deny(AccessRight::Write),
        ];
        assert!(evaluate(&rules, AccessRight::Read));
    }

    #[test]
    fn test_static_acl_allow_all() {
        let acl = StaticAcl::allow_all();
        let rules = acl.rules_for(Path::new("/any")).unwrap();
        assert!(evaluate(&rules, AccessRight::Read));
        assert!(evaluate(&rules, AccessRight::Write));
    }

    #[test]
    fn test_static_acl_failing_query() {
        let acl = StaticAcl::failing();
        assert!(matches!(
            acl.rules_for(Path::new("/any")),
            Err(AclError::Unavailable)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_host_acl_missing_path_is_query_error() {
        let acl = HostAcl;
        let result = acl.rules_for(Path::new("/definitely/not/a/real/path"));
        assert!(matches!(result, Err(AclError::Query(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_host_acl_grants_on_writable_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        let acl = HostAcl;
        let rules = acl.rules_for(dir.path()).unwrap();
        assert!(evaluate(&rules, AccessRight::Read));
        assert!(evaluate(&rules, AccessRight::Write));
    }
}
