/// Property tests for traversal invariants over generated forests
use proptest::prelude::*;
use taxmap_test::random_forest;
use taxmap_tree::{subtaxa, supertaxa, TraversalOptions};

proptest! {
    #[test]
    fn descendants_and_ancestors_are_symmetric(taxa in 2usize..40, seed in 0u64..1000) {
        let tree = random_forest(taxa, seed);
        let options = TraversalOptions::default();

        for taxon in tree.ids() {
            let down = subtaxa(&tree, &[taxon], &options).unwrap();
            for descendant in down.taxon_ids() {
                let up = supertaxa(&tree, &[descendant], &options).unwrap();
                prop_assert!(up.taxon_ids().contains(&taxon));
            }
        }
    }

    #[test]
    fn non_recursive_subtaxa_equals_stored_children(taxa in 2usize..40, seed in 0u64..1000) {
        let tree = random_forest(taxa, seed);
        let options = TraversalOptions::default().recursive(false);

        for taxon in tree.ids() {
            let out = subtaxa(&tree, &[taxon], &options).unwrap();
            prop_assert_eq!(out.taxon_ids(), tree.children(taxon).unwrap().to_vec());
        }
    }

    #[test]
    fn root_supertaxa_always_empty(taxa in 2usize..40, seed in 0u64..1000) {
        let tree = random_forest(taxa, seed);
        let options = TraversalOptions::default();

        for &root in tree.roots() {
            let out = supertaxa(&tree, &[root], &options).unwrap();
            prop_assert!(out.taxon_ids().is_empty());
        }
    }

    #[test]
    fn depth_matches_ancestor_count(taxa in 2usize..40, seed in 0u64..1000) {
        let tree = random_forest(taxa, seed);
        let options = TraversalOptions::default();

        for taxon in tree.ids() {
            let up = supertaxa(&tree, &[taxon], &options).unwrap();
            prop_assert_eq!(tree.depth(taxon).unwrap() as usize, up.taxon_ids().len());
        }
    }
}

#[test]
fn generated_forests_have_valid_roots() {
    let tree = random_forest(25, 7);
    for &root in tree.roots() {
        assert_eq!(tree.parent(root).unwrap(), None);
        assert_eq!(tree.depth(root).unwrap(), 0);
    }
}
