//! Hierarchical taxonomy structure with construction-time validation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use taxmap_core::{TaxmapError, TaxmapResult, TaxonId};

/// Raw taxon record used to build a tree
///
/// This is the construction contract for collaborators that populate a
/// taxonomy from classification data: an id, an optional parent id, and
/// whatever name/rank labels are known. Child lists are derived from the
/// parent links in record insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRecord {
    pub id: TaxonId,
    pub name: String,
    pub rank: Option<String>,
    pub parent: Option<TaxonId>,
}

impl TaxonRecord {
    pub fn new(id: impl Into<TaxonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank: None,
            parent: None,
        }
    }

    pub fn with_rank(mut self, rank: impl Into<String>) -> Self {
        self.rank = Some(rank.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<TaxonId>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// One node of the classification hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxon {
    pub id: TaxonId,
    pub name: String,
    pub rank: Option<String>,
    pub parent: Option<TaxonId>,
    // Stored in insertion order; traversal order depends on it
    children: Vec<TaxonId>,
}

impl Taxon {
    /// Ordered ids of this taxon's direct children (empty for leaves)
    pub fn children(&self) -> &[TaxonId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Immutable taxonomy forest: taxa in a global insertion-ordered table,
/// parent links, per-node ordered child lists, and an ordered root list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyTree {
    taxa: IndexMap<TaxonId, Taxon>,
    roots: Vec<TaxonId>,
}

impl TaxonomyTree {
    /// Build a tree from raw records, validating the structural invariants.
    ///
    /// Fails with `TaxmapError::Structure` on a duplicate id, a parent id
    /// that does not resolve to any record, or a cycle in the parent
    /// relation. The tree is never partially built.
    pub fn from_records(records: Vec<TaxonRecord>) -> TaxmapResult<Self> {
        let mut taxa: IndexMap<TaxonId, Taxon> = IndexMap::with_capacity(records.len());
        let mut roots = Vec::new();

        for record in &records {
            let taxon = Taxon {
                id: record.id,
                name: record.name.clone(),
                rank: record.rank.clone(),
                parent: record.parent,
                children: Vec::new(),
            };
            if taxa.insert(record.id, taxon).is_some() {
                return Err(TaxmapError::Structure(format!(
                    "duplicate taxon id: {}",
                    record.id
                )));
            }
        }

        // Link children in record insertion order
        for record in &records {
            match record.parent {
                Some(parent_id) => {
                    if !taxa.contains_key(&parent_id) {
                        return Err(TaxmapError::Structure(format!(
                            "taxon {} references unknown parent {}",
                            record.id, parent_id
                        )));
                    }
                    taxa[&parent_id].children.push(record.id);
                }
                None => roots.push(record.id),
            }
        }

        let tree = Self { taxa, roots };
        tree.check_acyclic()?;
        tracing::debug!(
            taxa = tree.taxa.len(),
            roots = tree.roots.len(),
            "built taxonomy tree"
        );
        Ok(tree)
    }

    // Walks each parent chain; a chain longer than the taxon count can
    // only mean the parent relation loops back on itself.
    fn check_acyclic(&self) -> TaxmapResult<()> {
        let limit = self.taxa.len();
        for &id in self.taxa.keys() {
            let mut current = id;
            let mut steps = 0usize;
            while let Some(parent) = self.taxa[&current].parent {
                steps += 1;
                if steps > limit {
                    return Err(TaxmapError::Structure(format!(
                        "cycle in parent relation involving taxon {}",
                        id
                    )));
                }
                current = parent;
            }
        }
        Ok(())
    }

    /// Look up a taxon, failing if the id is unknown
    pub fn taxon(&self, id: TaxonId) -> TaxmapResult<&Taxon> {
        self.taxa.get(&id).ok_or(TaxmapError::TaxonNotFound(id))
    }

    /// Look up a taxon without failing
    pub fn get(&self, id: TaxonId) -> Option<&Taxon> {
        self.taxa.get(&id)
    }

    /// The parent of a taxon, `None` for roots
    pub fn parent(&self, id: TaxonId) -> TaxmapResult<Option<TaxonId>> {
        Ok(self.taxon(id)?.parent)
    }

    /// Ordered direct children of a taxon (empty slice for leaves)
    pub fn children(&self, id: TaxonId) -> TaxmapResult<&[TaxonId]> {
        Ok(self.taxon(id)?.children())
    }

    /// Ordered root taxa; more than one root is a forest
    pub fn roots(&self) -> &[TaxonId] {
        &self.roots
    }

    /// Depth of a taxon in the hierarchy. Roots are at depth 0; quota
    /// vectors in the sampling engine are keyed by this value.
    pub fn depth(&self, id: TaxonId) -> TaxmapResult<u32> {
        let mut depth = 0u32;
        let mut current = self.taxon(id)?;
        while let Some(parent) = current.parent {
            depth += 1;
            current = self.taxon(parent)?;
        }
        Ok(depth)
    }

    /// Position of a taxon in the global taxon table
    pub fn index_of(&self, id: TaxonId) -> Option<usize> {
        self.taxa.get_index_of(&id)
    }

    pub fn contains(&self, id: TaxonId) -> bool {
        self.taxa.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Iterate over taxa in table order
    pub fn iter(&self) -> impl Iterator<Item = &Taxon> {
        self.taxa.values()
    }

    /// Taxon ids in table order
    pub fn ids(&self) -> impl Iterator<Item = TaxonId> + '_ {
        self.taxa.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TaxonRecord> {
        vec![
            TaxonRecord::new(1u32, "A").with_rank("family"),
            TaxonRecord::new(2u32, "B").with_rank("genus").with_parent(1u32),
            TaxonRecord::new(3u32, "C").with_rank("species").with_parent(2u32),
            TaxonRecord::new(4u32, "D").with_rank("species").with_parent(2u32),
            TaxonRecord::new(5u32, "E").with_rank("genus").with_parent(1u32),
        ]
    }

    #[test]
    fn test_build_preserves_child_order() {
        let tree = TaxonomyTree::from_records(records()).unwrap();
        assert_eq!(
            tree.children(TaxonId::new(1)).unwrap(),
            &[TaxonId::new(2), TaxonId::new(5)]
        );
        assert_eq!(
            tree.children(TaxonId::new(2)).unwrap(),
            &[TaxonId::new(3), TaxonId::new(4)]
        );
        assert!(tree.children(TaxonId::new(5)).unwrap().is_empty());
    }

    #[test]
    fn test_roots_and_parents() {
        let tree = TaxonomyTree::from_records(records()).unwrap();
        assert_eq!(tree.roots(), &[TaxonId::new(1)]);
        assert_eq!(tree.parent(TaxonId::new(1)).unwrap(), None);
        assert_eq!(tree.parent(TaxonId::new(3)).unwrap(), Some(TaxonId::new(2)));
    }

    #[test]
    fn test_depth_convention() {
        let tree = TaxonomyTree::from_records(records()).unwrap();
        assert_eq!(tree.depth(TaxonId::new(1)).unwrap(), 0);
        assert_eq!(tree.depth(TaxonId::new(2)).unwrap(), 1);
        assert_eq!(tree.depth(TaxonId::new(3)).unwrap(), 2);
    }

    #[test]
    fn test_forest_with_multiple_roots() {
        let tree = TaxonomyTree::from_records(vec![
            TaxonRecord::new(1u32, "X"),
            TaxonRecord::new(2u32, "Y"),
            TaxonRecord::new(3u32, "Z").with_parent(2u32),
        ])
        .unwrap();
        assert_eq!(tree.roots(), &[TaxonId::new(1), TaxonId::new(2)]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = TaxonomyTree::from_records(vec![
            TaxonRecord::new(1u32, "A"),
            TaxonRecord::new(1u32, "B"),
        ]);
        match result.unwrap_err() {
            TaxmapError::Structure(msg) => assert!(msg.contains("duplicate")),
            other => panic!("expected Structure error, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_parent_rejected() {
        let result =
            TaxonomyTree::from_records(vec![TaxonRecord::new(1u32, "A").with_parent(99u32)]);
        match result.unwrap_err() {
            TaxmapError::Structure(msg) => assert!(msg.contains("unknown parent")),
            other => panic!("expected Structure error, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_rejected() {
        let result = TaxonomyTree::from_records(vec![
            TaxonRecord::new(1u32, "A").with_parent(2u32),
            TaxonRecord::new(2u32, "B").with_parent(1u32),
        ]);
        match result.unwrap_err() {
            TaxmapError::Structure(msg) => assert!(msg.contains("cycle")),
            other => panic!("expected Structure error, got {:?}", other),
        }
    }

    #[test]
    fn test_self_parent_rejected() {
        let result =
            TaxonomyTree::from_records(vec![TaxonRecord::new(1u32, "A").with_parent(1u32)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_taxon_lookup() {
        let tree = TaxonomyTree::from_records(records()).unwrap();
        match tree.children(TaxonId::new(42)).unwrap_err() {
            TaxmapError::TaxonNotFound(id) => assert_eq!(id, TaxonId::new(42)),
            other => panic!("expected TaxonNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_index_of_follows_table_order() {
        let tree = TaxonomyTree::from_records(records()).unwrap();
        assert_eq!(tree.index_of(TaxonId::new(1)), Some(0));
        assert_eq!(tree.index_of(TaxonId::new(5)), Some(4));
        assert_eq!(tree.index_of(TaxonId::new(42)), None);
    }
}
