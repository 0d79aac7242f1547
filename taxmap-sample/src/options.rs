//! Quota configuration for the sampling engine

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use taxmap_core::config::SamplingConfig;
use taxmap_core::{TaxmapError, TaxmapResult};

/// Level-keyed quota vectors and draw configuration
///
/// Levels are tree depths (roots at 0, see `TaxonomyTree::depth`). A
/// level missing from a vector is unconstrained. `max_*` bounds trigger
/// a uniform random draw without replacement down to the bound; counts
/// below a `min_*` bound exclude the candidate set entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleOptions {
    /// Maximum observations kept per taxon, by level
    pub max_obs: HashMap<u32, usize>,
    /// Minimum observations required per taxon, by level
    pub min_obs: HashMap<u32, usize>,
    /// Maximum children recursed into per taxon, by level
    pub max_children: HashMap<u32, usize>,
    /// Minimum children required per taxon, by level
    pub min_children: HashMap<u32, usize>,
    /// Seed for the shared random source; `None` means seed 0
    pub seed: Option<u64>,
    /// Sample sibling subtrees on worker threads with per-subtree
    /// random streams derived from the seed. Reproducible against
    /// itself, but draw sequences differ from sequential mode.
    pub parallel: bool,
}

impl SampleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SamplingConfig) -> Self {
        Self {
            seed: config.seed,
            parallel: config.parallel,
            ..Self::default()
        }
    }

    pub fn with_max_obs(mut self, level: u32, bound: usize) -> Self {
        self.max_obs.insert(level, bound);
        self
    }

    pub fn with_min_obs(mut self, level: u32, bound: usize) -> Self {
        self.min_obs.insert(level, bound);
        self
    }

    pub fn with_max_children(mut self, level: u32, bound: usize) -> Self {
        self.max_children.insert(level, bound);
        self
    }

    pub fn with_min_children(mut self, level: u32, bound: usize) -> Self {
        self.min_children.insert(level, bound);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject contradictory quotas before any recursion starts
    pub fn validate(&self) -> TaxmapResult<()> {
        for (level, &min) in &self.min_obs {
            if let Some(&max) = self.max_obs.get(level) {
                if min > max {
                    return Err(TaxmapError::Configuration(format!(
                        "min_obs {} exceeds max_obs {} at level {}",
                        min, max, level
                    )));
                }
            }
        }
        for (level, &min) in &self.min_children {
            if let Some(&max) = self.max_children.get(level) {
                if min > max {
                    return Err(TaxmapError::Configuration(format!(
                        "min_children {} exceeds max_children {} at level {}",
                        min, max, level
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_validate() {
        let options = SampleOptions::new()
            .with_max_obs(1, 10)
            .with_min_obs(1, 2)
            .with_max_children(0, 5)
            .with_seed(42);
        assert!(options.validate().is_ok());
        assert_eq!(options.max_obs[&1], 10);
        assert_eq!(options.seed, Some(42));
    }

    #[test]
    fn test_contradictory_obs_quota_rejected() {
        let options = SampleOptions::new().with_max_obs(1, 2).with_min_obs(1, 5);
        match options.validate().unwrap_err() {
            TaxmapError::Configuration(msg) => assert!(msg.contains("min_obs")),
            other => panic!("expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_contradictory_child_quota_rejected() {
        let options = SampleOptions::new()
            .with_max_children(2, 1)
            .with_min_children(2, 3);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_disjoint_levels_are_fine() {
        // Bounds on different levels never conflict
        let options = SampleOptions::new().with_max_obs(1, 2).with_min_obs(2, 5);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = SamplingConfig {
            seed: Some(7),
            parallel: true,
        };
        let options = SampleOptions::from_config(&config);
        assert_eq!(options.seed, Some(7));
        assert!(options.parallel);
        assert!(options.max_obs.is_empty());
    }
}
