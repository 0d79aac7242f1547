//! Test utilities for the Taxmap workspace
//!
//! Provides the canonical fixtures used across the workspace test suites:
//! the five-taxon reference tree, the ten-observation attachment over it,
//! and seeded random forest generators for property tests.

pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{
    fixture_map, fixture_tree, random_forest, random_map, TAXON_A, TAXON_B, TAXON_C, TAXON_D,
    TAXON_E,
};

// Re-export test dependencies for convenience
pub use anyhow::Result;
pub use tempfile;

/// Initialize test logging (call once per test module)
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
