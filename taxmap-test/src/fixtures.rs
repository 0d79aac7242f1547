//! Test fixtures and data generators
//!
//! The reference tree is the five-taxon hierarchy used throughout the
//! workspace tests:
//!
//! ```text
//! A ── B ── C
//! │    └── D
//! └── E
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use taxmap_core::TaxonId;
use taxmap_tree::{Observation, TaxonRecord, TaxonomyMap, TaxonomyTree};

pub const TAXON_A: TaxonId = TaxonId(1);
pub const TAXON_B: TaxonId = TaxonId(2);
pub const TAXON_C: TaxonId = TaxonId(3);
pub const TAXON_D: TaxonId = TaxonId(4);
pub const TAXON_E: TaxonId = TaxonId(5);

/// The five-taxon reference tree: A with children [B, E], B with [C, D]
pub fn fixture_tree() -> TaxonomyTree {
    TaxonomyTree::from_records(vec![
        TaxonRecord::new(TAXON_A, "A").with_rank("family"),
        TaxonRecord::new(TAXON_B, "B").with_rank("genus").with_parent(TAXON_A),
        TaxonRecord::new(TAXON_C, "C").with_rank("species").with_parent(TAXON_B),
        TaxonRecord::new(TAXON_D, "D").with_rank("species").with_parent(TAXON_B),
        TaxonRecord::new(TAXON_E, "E").with_rank("genus").with_parent(TAXON_A),
    ])
    .expect("reference tree is valid")
}

/// The reference tree with ten observations attached directly to taxa,
/// with per-taxon counts A:2, B:2, C:3, D:2, E:1
pub fn fixture_map() -> TaxonomyMap {
    let mut map = TaxonomyMap::new(fixture_tree());
    let attachments = [
        (1u32, TAXON_A),
        (2, TAXON_A),
        (3, TAXON_B),
        (4, TAXON_B),
        (5, TAXON_C),
        (6, TAXON_C),
        (7, TAXON_C),
        (8, TAXON_D),
        (9, TAXON_D),
        (10, TAXON_E),
    ];
    for (obs_id, taxon) in attachments {
        map.attach(Observation::new(obs_id, taxon).with_attr(
            "label",
            serde_json::json!(format!("obs_{}", obs_id)),
        ))
        .expect("reference attachment is valid");
    }
    map
}

/// Generate a random forest with the given number of taxa
///
/// Every non-first taxon picks a parent among the taxa inserted before it
/// (or becomes a new root), so the result is always acyclic and child
/// lists follow insertion order.
pub fn random_forest(taxa: usize, seed: u64) -> TaxonomyTree {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(taxa);

    for i in 0..taxa {
        let id = (i + 1) as u32;
        let mut record = TaxonRecord::new(id, format!("taxon_{}", id));
        if i > 0 && rng.gen_range(0..4) != 0 {
            let parent = rng.gen_range(1..=i as u32);
            record = record.with_parent(parent);
        }
        records.push(record);
    }

    TaxonomyTree::from_records(records).expect("generated forest is valid")
}

/// Generate a random forest with observations scattered over its taxa
pub fn random_map(taxa: usize, observations: usize, seed: u64) -> TaxonomyMap {
    let tree = random_forest(taxa, seed);
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut map = TaxonomyMap::new(tree);

    for i in 0..observations {
        let taxon = rng.gen_range(1..=taxa as u32);
        map.attach(Observation::new((i + 1) as u32, taxon))
            .expect("generated attachment is valid");
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_counts() {
        let map = fixture_map();
        assert_eq!(map.total_obs(), 10);
        assert_eq!(map.obs_count(TAXON_A).unwrap(), 2);
        assert_eq!(map.obs_count(TAXON_C).unwrap(), 3);
        assert_eq!(map.obs_count(TAXON_E).unwrap(), 1);
    }

    #[test]
    fn test_random_forest_deterministic() {
        let a = random_forest(20, 42);
        let b = random_forest(20, 42);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x, y);
        }
    }
}
