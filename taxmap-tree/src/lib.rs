//! Taxonomy tree, observation records, and hierarchy traversal for Taxmap
//!
//! The tree is immutable once built: construction validates the structural
//! invariants (unique ids, resolvable parents, no cycles) and fails rather
//! than producing a partial hierarchy. Everything else in the workspace
//! reads the tree through the accessors here.

pub mod display;
pub mod map;
pub mod traversal;
pub mod tree;

// Re-export commonly used types
pub use display::format_tree;
pub use map::{Observation, TaxonomyMap};
pub use traversal::{subtaxa, supertaxa, TaxonHit, TraversalOptions, TraversalOutput};
pub use tree::{Taxon, TaxonRecord, TaxonomyTree};
