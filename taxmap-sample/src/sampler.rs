//! The depth-first sampling recursion

use indexmap::{IndexMap, IndexSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use taxmap_core::{ObservationId, TaxmapResult, TaxonId};
use taxmap_tree::{subtaxa, TaxonomyMap, TraversalOptions};

use crate::filter::{FilterParams, TaxonFilter};
use crate::options::SampleOptions;

/// Recursively resample a taxonomy map, respecting its hierarchy.
///
/// Walks the tree from each root, applying stop predicates, child and
/// observation filters, and the per-level quotas in `options`. Returns a
/// new map with the same tree and records; each taxon keeps the
/// observations that survived the walk, and taxa left with zero
/// observations stay in the map.
///
/// Sequential mode (the default) threads one seeded random source through
/// the whole recursion, so a fixed seed reproduces the sample exactly.
/// With `options.parallel`, sibling subtrees run on worker threads with
/// random streams derived from the seed and the subtree root's id; that
/// mode is reproducible against itself but draws differently from
/// sequential mode.
pub fn taxonomic_sample(
    map: &TaxonomyMap,
    options: &SampleOptions,
    filters: &[&dyn TaxonFilter],
    params: &FilterParams,
) -> TaxmapResult<TaxonomyMap> {
    options.validate()?;
    info!(
        taxa = map.tree().len(),
        observations = map.total_obs(),
        parallel = options.parallel,
        "sampling taxonomy map"
    );

    let sampler = Sampler {
        map,
        options,
        filters,
        params,
    };
    let base_seed = options.seed.unwrap_or(0);
    let roots: Vec<TaxonId> = map.tree().roots().to_vec();

    let mut survivors: IndexSet<ObservationId> = IndexSet::new();
    if options.parallel {
        let sets = roots
            .par_iter()
            .map(|&root| sampler.sample_subtree_seeded(root, base_seed))
            .collect::<TaxmapResult<Vec<_>>>()?;
        for set in sets {
            survivors.extend(set);
        }
    } else {
        let mut rng = StdRng::seed_from_u64(base_seed);
        for &root in &roots {
            survivors.extend(sampler.sample_subtree(root, &mut rng)?);
        }
    }

    let mut assignments: IndexMap<TaxonId, IndexSet<ObservationId>> =
        IndexMap::with_capacity(map.assignments().len());
    for (&taxon, obs) in map.assignments() {
        let kept = obs
            .iter()
            .copied()
            .filter(|id| survivors.contains(id))
            .collect();
        assignments.insert(taxon, kept);
    }

    // Survivors may carry ids injected by user filters that no record
    // backs, so this count cannot assume survivors is a subset
    info!(
        kept = survivors.len(),
        dropped = map.total_obs().saturating_sub(survivors.len()),
        "sampling complete"
    );
    map.with_assignments(assignments)
}

struct Sampler<'a> {
    map: &'a TaxonomyMap,
    options: &'a SampleOptions,
    filters: &'a [&'a dyn TaxonFilter],
    params: &'a FilterParams,
}

impl Sampler<'_> {
    fn sample_subtree(
        &self,
        taxon: TaxonId,
        rng: &mut StdRng,
    ) -> TaxmapResult<IndexSet<ObservationId>> {
        let level = self.map.tree().depth(taxon)?;

        if self.should_stop(taxon)? {
            debug!(%taxon, level, "stop condition met, keeping subtree in place");
            let obs = self.subtree_observations(taxon)?;
            let obs = self.apply_obs_filters(obs, taxon)?;
            return self.apply_obs_bounds(obs, taxon, level, rng);
        }

        let children = match self.plan_children(taxon, level, rng)? {
            Some(children) => children,
            None => return Ok(IndexSet::new()),
        };

        let mut candidate = self.map.observations(taxon)?.clone();
        for child in children {
            candidate.extend(self.sample_subtree(child, rng)?);
        }
        let candidate = self.apply_obs_filters(candidate, taxon)?;
        self.apply_obs_bounds(candidate, taxon, level, rng)
    }

    // Parallel twin of sample_subtree: draws come from a random stream
    // derived from the base seed and this subtree's root id, so sibling
    // subtrees never contend for one generator.
    fn sample_subtree_seeded(
        &self,
        taxon: TaxonId,
        base_seed: u64,
    ) -> TaxmapResult<IndexSet<ObservationId>> {
        let mut rng = StdRng::seed_from_u64(derive_seed(base_seed, taxon));
        let level = self.map.tree().depth(taxon)?;

        if self.should_stop(taxon)? {
            debug!(%taxon, level, "stop condition met, keeping subtree in place");
            let obs = self.subtree_observations(taxon)?;
            let obs = self.apply_obs_filters(obs, taxon)?;
            return self.apply_obs_bounds(obs, taxon, level, &mut rng);
        }

        let children = match self.plan_children(taxon, level, &mut rng)? {
            Some(children) => children,
            None => return Ok(IndexSet::new()),
        };

        let child_sets = children
            .par_iter()
            .map(|&child| self.sample_subtree_seeded(child, base_seed))
            .collect::<TaxmapResult<Vec<_>>>()?;

        let mut candidate = self.map.observations(taxon)?.clone();
        for set in child_sets {
            candidate.extend(set);
        }
        let candidate = self.apply_obs_filters(candidate, taxon)?;
        self.apply_obs_bounds(candidate, taxon, level, &mut rng)
    }

    fn should_stop(&self, taxon: TaxonId) -> TaxmapResult<bool> {
        for filter in self.filters {
            if filter.stop(taxon, self.map, self.params)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // Immediate children after user filters and child-count quotas.
    // `None` means the whole subtree is excluded from this sample.
    fn plan_children(
        &self,
        taxon: TaxonId,
        level: u32,
        rng: &mut StdRng,
    ) -> TaxmapResult<Option<Vec<TaxonId>>> {
        let immediate = TraversalOptions::default().recursive(false);
        let mut children = subtaxa(self.map.tree(), &[taxon], &immediate)?.taxon_ids();

        for filter in self.filters {
            match filter.filter_subtaxa(&children, taxon, self.map, self.params)? {
                Some(kept) => children = kept,
                None => {
                    debug!(%taxon, "subtaxa filter returned no result, excluding subtree");
                    return Ok(None);
                }
            }
        }

        if let Some(&max) = self.options.max_children.get(&level) {
            if children.len() > max {
                debug!(%taxon, from = children.len(), to = max, "drawing child subset");
                children = draw_children(children, max, rng);
            }
        }
        if let Some(&min) = self.options.min_children.get(&level) {
            if children.len() < min {
                debug!(%taxon, count = children.len(), min, "child count below minimum, excluding subtree");
                return Ok(None);
            }
        }

        Ok(Some(children))
    }

    // Observations of the taxon and its whole subtree, used when a stop
    // condition keeps the subtree intact without descending.
    fn subtree_observations(&self, taxon: TaxonId) -> TaxmapResult<IndexSet<ObservationId>> {
        let mut obs = self.map.observations(taxon)?.clone();
        let descendants = subtaxa(self.map.tree(), &[taxon], &TraversalOptions::default())?;
        for id in descendants.taxon_ids() {
            obs.extend(self.map.observations(id)?.iter().copied());
        }
        Ok(obs)
    }

    fn apply_obs_filters(
        &self,
        mut obs: IndexSet<ObservationId>,
        taxon: TaxonId,
    ) -> TaxmapResult<IndexSet<ObservationId>> {
        for filter in self.filters {
            match filter.filter_observations(&obs, taxon, self.map, self.params)? {
                Some(kept) => obs = kept,
                // Absent result means the empty set, later filters still run
                None => obs = IndexSet::new(),
            }
        }
        Ok(obs)
    }

    fn apply_obs_bounds(
        &self,
        mut obs: IndexSet<ObservationId>,
        taxon: TaxonId,
        level: u32,
        rng: &mut StdRng,
    ) -> TaxmapResult<IndexSet<ObservationId>> {
        if let Some(&max) = self.options.max_obs.get(&level) {
            if obs.len() > max {
                debug!(%taxon, from = obs.len(), to = max, "drawing observation subset");
                obs = draw_observations(obs, max, rng);
            }
        }
        if let Some(&min) = self.options.min_obs.get(&level) {
            if obs.len() < min {
                debug!(%taxon, count = obs.len(), min, "observation count below minimum, dropping set");
                return Ok(IndexSet::new());
            }
        }
        Ok(obs)
    }
}

// Uniform draw without replacement, preserving the set's original order
fn draw_observations(
    set: IndexSet<ObservationId>,
    amount: usize,
    rng: &mut StdRng,
) -> IndexSet<ObservationId> {
    let mut picks = rand::seq::index::sample(rng, set.len(), amount).into_vec();
    picks.sort_unstable();
    picks
        .into_iter()
        .filter_map(|i| set.get_index(i).copied())
        .collect()
}

fn draw_children(children: Vec<TaxonId>, amount: usize, rng: &mut StdRng) -> Vec<TaxonId> {
    let mut picks = rand::seq::index::sample(rng, children.len(), amount).into_vec();
    picks.sort_unstable();
    picks.into_iter().map(|i| children[i]).collect()
}

fn derive_seed(base: u64, taxon: TaxonId) -> u64 {
    base ^ u64::from(taxon.value()).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_preserves_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let set: IndexSet<ObservationId> = (1u32..=10).map(ObservationId::new).collect();
        let drawn = draw_observations(set.clone(), 4, &mut rng);

        assert_eq!(drawn.len(), 4);
        let positions: Vec<usize> = drawn
            .iter()
            .map(|id| set.get_index_of(id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_draw_is_seed_deterministic() {
        let set: IndexSet<ObservationId> = (1u32..=20).map(ObservationId::new).collect();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        assert_eq!(
            draw_observations(set.clone(), 5, &mut rng_a),
            draw_observations(set.clone(), 5, &mut rng_b)
        );
    }

    #[test]
    fn test_derive_seed_varies_by_taxon() {
        assert_ne!(
            derive_seed(0, TaxonId::new(1)),
            derive_seed(0, TaxonId::new(2))
        );
    }
}
