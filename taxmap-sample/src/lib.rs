//! Recursive, level-aware resampling of a taxonomy map
//!
//! The sampler walks the tree depth-first from its roots, applies
//! caller-supplied stop predicates and filters, enforces per-level
//! child and observation quotas, and returns a new map with the same
//! tree but a pruned observation attachment. The tree itself is never
//! mutated.

pub mod filter;
pub mod options;
pub mod sampler;

// Re-export commonly used types
pub use filter::{ChildAllowList, FilterParams, ObsAttrFilter, StopAtDepth, StopAtRank, TaxonFilter};
pub use options::SampleOptions;
pub use sampler::taxonomic_sample;
