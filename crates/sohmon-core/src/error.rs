//! Error taxonomy shared across the sohmon crates

use thiserror::Error;

/// Result alias used throughout the sohmon crates
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the client components and service clients
#[derive(Debug, Error)]
pub enum Error {
    /// The voltage vector holds non-numeric slots; carries every offending
    /// index (0-based). Nothing is sent while this fires.
    #[error("voltage vector has non-numeric readings at indices {0:?}")]
    Validation(Vec<usize>),

    /// A voltage slot was addressed outside the fixed vector.
    #[error("voltage slot index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A prediction submission was attempted while one is outstanding.
    #[error("a prediction request is already in flight")]
    RequestInProgress,

    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("service error: {0}")]
    Service(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
