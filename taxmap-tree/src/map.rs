//! Observation records and the taxonomy map aggregate

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use taxmap_core::{ObservationId, TaxmapError, TaxmapResult, TaxonId};

use crate::traversal::{subtaxa, TraversalOptions};
use crate::tree::TaxonomyTree;

/// One classified item (e.g. a sequence) assigned to exactly one taxon
///
/// The taxon is the most specific level at which the item was classified;
/// it does not have to be a leaf. Attribute data is free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: ObservationId,
    pub taxon: TaxonId,
    #[serde(default)]
    pub attrs: HashMap<String, serde_json::Value>,
}

impl Observation {
    pub fn new(id: impl Into<ObservationId>, taxon: impl Into<TaxonId>) -> Self {
        Self {
            id: id.into(),
            taxon: taxon.into(),
            attrs: HashMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }
}

/// The working aggregate: a taxonomy tree plus observation records and the
/// taxon → observation-set attachment mapping.
///
/// Read-mostly by design. The sampling engine never mutates a map in
/// place; it produces a new value with the same tree and records but a
/// replaced attachment mapping. Taxa with zero observations stay in the
/// mapping; deleting them is a separate, explicit subsetting step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyMap {
    tree: TaxonomyTree,
    assignments: IndexMap<TaxonId, IndexSet<ObservationId>>,
    observations: IndexMap<ObservationId, Observation>,
}

impl TaxonomyMap {
    /// Wrap a tree with an empty observation set for every taxon
    pub fn new(tree: TaxonomyTree) -> Self {
        let assignments = tree.ids().map(|id| (id, IndexSet::new())).collect();
        Self {
            tree,
            assignments,
            observations: IndexMap::new(),
        }
    }

    /// Attach an observation to its assigned taxon
    pub fn attach(&mut self, observation: Observation) -> TaxmapResult<()> {
        if !self.tree.contains(observation.taxon) {
            return Err(TaxmapError::TaxonNotFound(observation.taxon));
        }
        if self.observations.contains_key(&observation.id) {
            return Err(TaxmapError::InvalidInput(format!(
                "duplicate observation id: {}",
                observation.id
            )));
        }
        self.assignments[&observation.taxon].insert(observation.id);
        self.observations.insert(observation.id, observation);
        Ok(())
    }

    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    /// Observations directly attached to a taxon, in attachment order
    pub fn observations(&self, taxon: TaxonId) -> TaxmapResult<&IndexSet<ObservationId>> {
        self.assignments
            .get(&taxon)
            .ok_or(TaxmapError::TaxonNotFound(taxon))
    }

    pub fn observation(&self, id: ObservationId) -> Option<&Observation> {
        self.observations.get(&id)
    }

    /// The full attachment mapping, in taxon table order
    pub fn assignments(&self) -> &IndexMap<TaxonId, IndexSet<ObservationId>> {
        &self.assignments
    }

    /// Count of observations directly attached to a taxon
    pub fn obs_count(&self, taxon: TaxonId) -> TaxmapResult<usize> {
        Ok(self.observations(taxon)?.len())
    }

    /// Count of observations attached to a taxon or any of its descendants
    pub fn subtree_obs_count(&self, taxon: TaxonId) -> TaxmapResult<usize> {
        let mut count = self.obs_count(taxon)?;
        let options = TraversalOptions::default();
        let descendants = subtaxa(&self.tree, &[taxon], &options)?;
        for id in descendants.taxon_ids() {
            count += self.obs_count(id)?;
        }
        Ok(count)
    }

    /// Total number of observation records
    pub fn total_obs(&self) -> usize {
        self.observations.len()
    }

    /// Iterate over all observation records in attachment order
    pub fn iter_observations(&self) -> impl Iterator<Item = &Observation> {
        self.observations.values()
    }

    /// Produce a map with the same tree and records but a new attachment
    /// mapping. Taxa absent from `assignments` keep an empty set; ids in
    /// the new mapping must reference known taxa and observations.
    pub fn with_assignments(
        &self,
        assignments: IndexMap<TaxonId, IndexSet<ObservationId>>,
    ) -> TaxmapResult<Self> {
        let mut merged: IndexMap<TaxonId, IndexSet<ObservationId>> =
            self.tree.ids().map(|id| (id, IndexSet::new())).collect();
        for (taxon, obs) in assignments {
            let slot = merged
                .get_mut(&taxon)
                .ok_or(TaxmapError::TaxonNotFound(taxon))?;
            for id in obs {
                if !self.observations.contains_key(&id) {
                    return Err(TaxmapError::InvalidInput(format!(
                        "unknown observation id: {}",
                        id
                    )));
                }
                slot.insert(id);
            }
        }
        Ok(Self {
            tree: self.tree.clone(),
            assignments: merged,
            observations: self.observations.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TaxonRecord;

    fn map() -> TaxonomyMap {
        let tree = TaxonomyTree::from_records(vec![
            TaxonRecord::new(1u32, "A"),
            TaxonRecord::new(2u32, "B").with_parent(1u32),
            TaxonRecord::new(3u32, "C").with_parent(2u32),
        ])
        .unwrap();
        let mut map = TaxonomyMap::new(tree);
        map.attach(Observation::new(1u32, 1u32)).unwrap();
        map.attach(Observation::new(2u32, 2u32)).unwrap();
        map.attach(Observation::new(3u32, 3u32)).unwrap();
        map.attach(Observation::new(4u32, 3u32)).unwrap();
        map
    }

    #[test]
    fn test_attach_and_count() {
        let map = map();
        assert_eq!(map.obs_count(TaxonId::new(3)).unwrap(), 2);
        assert_eq!(map.total_obs(), 4);
    }

    #[test]
    fn test_subtree_count_includes_descendants() {
        let map = map();
        assert_eq!(map.subtree_obs_count(TaxonId::new(1)).unwrap(), 4);
        assert_eq!(map.subtree_obs_count(TaxonId::new(2)).unwrap(), 3);
        assert_eq!(map.subtree_obs_count(TaxonId::new(3)).unwrap(), 2);
    }

    #[test]
    fn test_attach_unknown_taxon_fails() {
        let mut map = map();
        let result = map.attach(Observation::new(9u32, 42u32));
        assert!(matches!(result, Err(TaxmapError::TaxonNotFound(_))));
    }

    #[test]
    fn test_attach_duplicate_observation_fails() {
        let mut map = map();
        let result = map.attach(Observation::new(1u32, 1u32));
        assert!(matches!(result, Err(TaxmapError::InvalidInput(_))));
    }

    #[test]
    fn test_with_assignments_keeps_empty_taxa() {
        let map = map();
        let mut assignments = IndexMap::new();
        assignments.insert(
            TaxonId::new(2),
            [ObservationId::new(2)].into_iter().collect(),
        );
        let sampled = map.with_assignments(assignments).unwrap();

        // Same tree, unassigned taxa kept with zero observations
        assert_eq!(sampled.tree().len(), 3);
        assert_eq!(sampled.obs_count(TaxonId::new(1)).unwrap(), 0);
        assert_eq!(sampled.obs_count(TaxonId::new(2)).unwrap(), 1);
        assert_eq!(sampled.obs_count(TaxonId::new(3)).unwrap(), 0);
        // Records are preserved even when no longer attached
        assert!(sampled.observation(ObservationId::new(4)).is_some());
    }

    #[test]
    fn test_with_assignments_rejects_unknown_ids() {
        let map = map();
        let mut assignments = IndexMap::new();
        assignments.insert(
            TaxonId::new(99),
            IndexSet::<ObservationId>::new(),
        );
        assert!(map.with_assignments(assignments).is_err());
    }

    #[test]
    fn test_observation_attrs() {
        let obs = Observation::new(1u32, 1u32)
            .with_attr("source", serde_json::json!("gut"))
            .with_attr("length", serde_json::json!(250));
        assert_eq!(obs.attrs["source"], serde_json::json!("gut"));
        assert_eq!(obs.attrs["length"], serde_json::json!(250));
    }
}
