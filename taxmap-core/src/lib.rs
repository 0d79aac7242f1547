//! Core types, errors, and configuration shared across all Taxmap crates

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{default_config, load_config, save_config, Config};
pub use error::{TaxmapError, TaxmapResult};
pub use types::{ObservationId, TaxonId};

/// Version information for the Taxmap project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
