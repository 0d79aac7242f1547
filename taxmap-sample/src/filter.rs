//! User-supplied predicates and filters for the sampling recursion

use std::collections::HashMap;
use std::collections::HashSet;

use indexmap::IndexSet;
use taxmap_core::{ObservationId, TaxmapResult, TaxonId};
use taxmap_tree::TaxonomyMap;

/// Shared extra parameters threaded through every filter call
pub type FilterParams = HashMap<String, serde_json::Value>;

/// Capability with three method slots invoked during sampling
///
/// All slots default to pass-through, so an implementation only overrides
/// the behavior it cares about. Filter failures propagate unmodified to
/// the caller of `taxonomic_sample`.
///
/// `filter_subtaxa` distinguishes two outcomes the recursion handles
/// differently: `Some(vec![])` means the taxon has no usable children but
/// its own observations still count, while `None` drops the taxon's whole
/// contribution, own observations included.
pub trait TaxonFilter: Sync {
    /// Stop descending at this taxon, keeping its subtree's observations
    /// where they are
    fn stop(
        &self,
        _taxon: TaxonId,
        _map: &TaxonomyMap,
        _params: &FilterParams,
    ) -> TaxmapResult<bool> {
        Ok(false)
    }

    /// Filter the immediate children recursed into under `taxon`
    fn filter_subtaxa(
        &self,
        children: &[TaxonId],
        _taxon: TaxonId,
        _map: &TaxonomyMap,
        _params: &FilterParams,
    ) -> TaxmapResult<Option<Vec<TaxonId>>> {
        Ok(Some(children.to_vec()))
    }

    /// Filter a taxon's candidate observation set
    fn filter_observations(
        &self,
        observations: &IndexSet<ObservationId>,
        _taxon: TaxonId,
        _map: &TaxonomyMap,
        _params: &FilterParams,
    ) -> TaxmapResult<Option<IndexSet<ObservationId>>> {
        Ok(Some(observations.clone()))
    }
}

/// Stop descending at taxa carrying the given rank label
#[derive(Debug, Clone)]
pub struct StopAtRank(pub String);

impl TaxonFilter for StopAtRank {
    fn stop(
        &self,
        taxon: TaxonId,
        map: &TaxonomyMap,
        _params: &FilterParams,
    ) -> TaxmapResult<bool> {
        Ok(map.tree().taxon(taxon)?.rank.as_deref() == Some(self.0.as_str()))
    }
}

/// Stop descending below the given depth
#[derive(Debug, Clone, Copy)]
pub struct StopAtDepth(pub u32);

impl TaxonFilter for StopAtDepth {
    fn stop(
        &self,
        taxon: TaxonId,
        map: &TaxonomyMap,
        _params: &FilterParams,
    ) -> TaxmapResult<bool> {
        Ok(map.tree().depth(taxon)? >= self.0)
    }
}

/// Recurse only into children on the allow list
#[derive(Debug, Clone)]
pub struct ChildAllowList(pub HashSet<TaxonId>);

impl TaxonFilter for ChildAllowList {
    fn filter_subtaxa(
        &self,
        children: &[TaxonId],
        _taxon: TaxonId,
        _map: &TaxonomyMap,
        _params: &FilterParams,
    ) -> TaxmapResult<Option<Vec<TaxonId>>> {
        Ok(Some(
            children
                .iter()
                .copied()
                .filter(|c| self.0.contains(c))
                .collect(),
        ))
    }
}

/// Keep observations whose attribute equals the given JSON value
#[derive(Debug, Clone)]
pub struct ObsAttrFilter {
    pub key: String,
    pub value: serde_json::Value,
}

impl TaxonFilter for ObsAttrFilter {
    fn filter_observations(
        &self,
        observations: &IndexSet<ObservationId>,
        _taxon: TaxonId,
        map: &TaxonomyMap,
        _params: &FilterParams,
    ) -> TaxmapResult<Option<IndexSet<ObservationId>>> {
        Ok(Some(
            observations
                .iter()
                .copied()
                .filter(|id| {
                    map.observation(*id)
                        .map(|obs| obs.attrs.get(&self.key) == Some(&self.value))
                        .unwrap_or(false)
                })
                .collect(),
        ))
    }
}
