//! Error types for the Tether operator

use thiserror::Error;

/// Main error type for Tether operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Kubernetes API error
    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Validation error for CRD specs
    #[error("validation error: {0}")]
    Validation(String),

    /// Operand reification error
    #[error("reify error: {0}")]
    Reify(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A connector carried a phase or desired state the engine cannot handle.
    ///
    /// This is a data invariant violation: it fails the single reconcile
    /// attempt and is retried on the next watch event, it never crashes the
    /// process.
    #[error("unsupported state: {0}")]
    UnsupportedState(String),
}

impl Error {
    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a reify error with the given message
    pub fn reify(msg: impl Into<String>) -> Self {
        Self::Reify(msg.into())
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
