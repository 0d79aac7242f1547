//! Core error types for Taxmap

use crate::types::TaxonId;
use thiserror::Error;

/// Main error type for Taxmap operations
#[derive(Error, Debug)]
pub enum TaxmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Taxonomy structure error: {0}")]
    Structure(String),

    #[error("Taxon not found: {0}")]
    TaxonNotFound(TaxonId),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Filter error: {0}")]
    Filter(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for Taxmap operations
pub type TaxmapResult<T> = Result<T, TaxmapError>;

// Conversion implementations for common error types
impl From<serde_json::Error> for TaxmapError {
    fn from(err: serde_json::Error) -> Self {
        TaxmapError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for TaxmapError {
    fn from(err: anyhow::Error) -> Self {
        TaxmapError::Other(err.to_string())
    }
}
