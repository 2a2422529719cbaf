//! Error types for the ventilation advisor

use classvent_classifier::ClassifierError;
use classvent_types::ObservationError;
use thiserror::Error;

/// Errors that can occur while producing a ventilation decision
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Observation fell outside the supported input domain
    #[error("Invalid observation: {0}")]
    InvalidObservation(#[from] ObservationError),

    /// Training or prediction failed
    #[error("Classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    /// Configuration could not be parsed or serialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;
