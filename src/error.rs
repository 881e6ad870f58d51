use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to the caller,
    /// such as an I/O error encountered while writing an output file.
    Internal,

    /// The caller provided malformed input or violated an operation's
    /// preconditions.
    User,
}

/// Condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Radix text uses the wrong alphabet, has the wrong length for the
    /// target width, is not a multiple of the required grouping, or is too
    /// short to be valid.
    InvalidInput,
    /// The PKCS7 trailer failed validation on unpad.
    InvalidPadding,
    /// A caller-supplied key, IV, ciphertext, or block size violates a
    /// length precondition.
    ContractViolation,
    /// Interaction with the filesystem failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct ByteviseError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Specific condition tag. Every error in this crate has a
    /// well-defined kind.
    pub kind: ErrorKind,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl ByteviseError {
    /// Creates a new error with a category, kind, and display message.
    pub fn new(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that retains the originating source error.
    pub fn with_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind,
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// Malformed radix text or other invalid caller input.
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCategory::User, ErrorKind::InvalidInput, msg)
    }

    /// PKCS7 trailer validation failure.
    pub(crate) fn invalid_padding(msg: impl Into<String>) -> Self {
        Self::new(ErrorCategory::User, ErrorKind::InvalidPadding, msg)
    }

    /// Length precondition violation on a cipher or padding operation.
    pub(crate) fn contract_violation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCategory::User, ErrorKind::ContractViolation, msg)
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving
    /// the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ByteviseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_message() {
        let err = ByteviseError::invalid_input("odd length");
        assert_eq!(format!("{}", err), "odd length");
    }

    #[test]
    fn test_kind_and_category() {
        let err = ByteviseError::invalid_padding("trailer mismatch");
        assert_eq!(err.kind, ErrorKind::InvalidPadding);
        assert_eq!(err.category, ErrorCategory::User);

        let err = ByteviseError::contract_violation("key must be 16 bytes");
        assert_eq!(err.kind, ErrorKind::ContractViolation);
    }

    #[test]
    fn test_with_context_preserves_kind() {
        let err = ByteviseError::invalid_input("bad char").with_context("failed to decode file");
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(err.message(), "failed to decode file");
        assert!(err.source_error().is_some());
    }

    #[test]
    fn test_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ByteviseError::with_source(ErrorCategory::User, ErrorKind::Io, "read failed", io);
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.source_error().is_some());
    }
}
