//! OperationOutcome: the result envelope returned by every store operation.
//!
//! A single call populates either success messages or errors, never both.
//! The payload is independent of success/error state (an existence check
//! carries a boolean payload alongside an empty error list).
//!
//! Domain-expected failures (denied, duplicate, not found) live here as
//! structured errors; cancellation and unexpected filesystem faults are
//! never wrapped into an outcome (see [`crate::store::CaskError`]).

use std::fmt;

/// The category of a domain-expected failure. Callers branch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The ACL lacked the required right, carried a deny entry, or the ACL
    /// query itself failed.
    AccessDenied,
    /// Store was asked to create an id that already exists.
    Duplicate,
    /// Update or delete was asked to touch an id that does not exist.
    NotFound,
}

/// One structured error inside an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// The envelope: optional payload, ordered success messages, ordered errors.
#[derive(Debug)]
pub struct OperationOutcome<T = ()> {
    payload: Option<T>,
    success_messages: Vec<String>,
    errors: Vec<OperationError>,
}

impl<T> OperationOutcome<T> {
    /// An empty outcome: no payload, no messages, no errors.
    pub fn new() -> Self {
        Self {
            payload: None,
            success_messages: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A successful outcome carrying a payload.
    pub fn with_payload(payload: T) -> Self {
        Self {
            payload: Some(payload),
            success_messages: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A failed outcome carrying a single structured error.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            payload: None,
            success_messages: Vec::new(),
            errors: vec![OperationError {
                kind,
                message: message.into(),
            }],
        }
    }

    /// A failed outcome carrying errors forwarded from another call.
    pub fn from_errors(errors: Vec<OperationError>) -> Self {
        Self {
            payload: None,
            success_messages: Vec::new(),
            errors,
        }
    }

    /// Record a success message. Must not be mixed with errors.
    pub fn add_success_message(&mut self, message: impl Into<String>) {
        debug_assert!(self.errors.is_empty());
        self.success_messages.push(message.into());
    }

    /// Record a structured error. Must not be mixed with success messages.
    pub fn append_error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        debug_assert!(self.success_messages.is_empty());
        self.errors.push(OperationError {
            kind,
            message: message.into(),
        });
    }

    pub fn set_payload(&mut self, payload: T) {
        self.payload = Some(payload);
    }

    /// True iff no errors were recorded.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// True iff an error of the given kind was recorded.
    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    pub fn success_messages(&self) -> &[String] {
        &self.success_messages
    }

    pub fn errors(&self) -> &[OperationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<OperationError> {
        self.errors
    }
}

impl<T> Default for OperationOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_successful_and_empty() {
        let outcome: OperationOutcome<u32> = OperationOutcome::new();
        assert!(outcome.succeeded());
        assert!(outcome.payload().is_none());
        assert!(outcome.success_messages().is_empty());
    }

    #[test]
    fn test_with_payload() {
        let outcome = OperationOutcome::with_payload(true);
        assert!(outcome.succeeded());
        assert_eq!(outcome.payload(), Some(&true));
    }

    #[test]
    fn test_failure_records_kind_and_message() {
        let outcome: OperationOutcome = OperationOutcome::failure(ErrorKind::Duplicate, "file already exists");
        assert!(!outcome.succeeded());
        assert!(outcome.has_error(ErrorKind::Duplicate));
        assert!(!outcome.has_error(ErrorKind::NotFound));
        assert_eq!(outcome.errors()[0].message, "file already exists");
    }

    #[test]
    fn test_errors_forward_between_envelopes() {
        let denied: OperationOutcome<bool> =
            OperationOutcome::failure(ErrorKind::AccessDenied, "no rights to perform this action");
        let forwarded: OperationOutcome<Vec<u8>> = OperationOutcome::from_errors(denied.into_errors());
        assert!(forwarded.has_error(ErrorKind::AccessDenied));
        assert!(forwarded.payload().is_none());
    }

    #[test]
    fn test_success_messages_are_ordered() {
        let mut outcome: OperationOutcome = OperationOutcome::new();
        outcome.add_success_message("first");
        outcome.add_success_message("second");
        assert_eq!(outcome.success_messages(), &["first", "second"]);
    }

    #[test]
    fn test_payload_independent_of_success_state() {
        // An existence check carries `false` as a payload on success.
        let outcome = OperationOutcome::with_payload(false);
        assert!(outcome.succeeded());
        assert_eq!(outcome.payload(), Some(&false));
    }
}
