//! Identifier types shared across the Taxmap workspace

pub mod ids;

pub use ids::{ObservationId, TaxonId};
