//! Limits for definition processing
//!
//! Definitions are walked recursively in both directions, so a deeply nested
//! or self-inlining tree would otherwise run until the call stack gives out.
//! These limits turn that into an ordinary error.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Limits applied while marshalling and unmarshalling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum nesting depth of structures
    pub max_depth: usize,

    /// Maximum document size in bytes accepted by the file entry points
    pub max_document_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_document_size: 100 * 1024 * 1024, // 100 MB
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_depth: 64,
            max_document_size: 10 * 1024 * 1024, // 10 MB
        }
    }

    /// Set the maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum document size
    pub fn with_max_document_size(mut self, size: usize) -> Self {
        self.max_document_size = size;
        self
    }

    /// Check if nesting depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            Err(Error::LimitExceeded(format!(
                "nesting depth {} exceeds maximum {}",
                depth, self.max_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if document size is within limits
    pub fn check_document_size(&self, size: usize) -> Result<()> {
        if size > self.max_document_size {
            Err(Error::LimitExceeded(format!(
                "document size {} bytes exceeds maximum {} bytes",
                size, self.max_document_size
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_depth, 512);
        assert!(limits.check_depth(100).is_ok());
        assert!(limits.check_depth(513).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_depth < Limits::default().max_depth);
        assert!(limits.check_depth(65).is_err());
    }

    #[test]
    fn test_check_document_size() {
        let limits = Limits::default().with_max_document_size(1024);
        assert!(limits.check_document_size(1024).is_ok());
        assert!(matches!(
            limits.check_document_size(1025),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_deserialize_partial() {
        let limits: Limits = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(limits.max_depth, 8);
        assert_eq!(limits.max_document_size, Limits::default().max_document_size);
    }
}
