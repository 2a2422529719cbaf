use thiserror::Error;

/// Errors returned by the deterministic classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Training data cannot support a meaningful fit
    #[error("insufficient training data: {0}")]
    InsufficientData(String),

    /// A query row does not line up with the learned column schema
    #[error("encoding mismatch: {0}")]
    EncodingMismatch(String),

    #[error("dataset error: {0}")]
    Dataset(String),
}

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;
