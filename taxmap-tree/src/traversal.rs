//! Ancestor and descendant queries over a taxonomy tree
//!
//! The two entry points are symmetric: [`supertaxa`] walks parent links
//! toward the roots, [`subtaxa`] walks child lists away from them. Both
//! accept a batch of query taxa and shape their output according to
//! [`TraversalOptions`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use taxmap_core::config::TraversalConfig;
use taxmap_core::{TaxmapResult, TaxonId};

use crate::tree::TaxonomyTree;

/// Options controlling traversal depth, self-inclusion, and output shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalOptions {
    /// Full chain/subtree if true, immediate neighbors only if false
    pub recursive: bool,
    /// Prepend the queried taxon to its own result
    pub include_input: bool,
    /// Flatten per-taxon results into one combined sequence
    pub simplify: bool,
    /// Report taxon-table positions instead of taxon ids
    pub return_index: bool,
    /// Render a root's empty ancestor chain as a single missing marker
    /// (supertaxa only; ignored by subtaxa)
    pub missing_as_na: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            include_input: false,
            simplify: false,
            return_index: false,
            missing_as_na: false,
        }
    }
}

impl TraversalOptions {
    pub fn from_config(config: &TraversalConfig) -> Self {
        Self {
            recursive: config.recursive,
            include_input: config.include_input,
            simplify: config.simplify,
            return_index: config.return_index,
            missing_as_na: config.missing_as_na,
        }
    }

    pub fn recursive(mut self, value: bool) -> Self {
        self.recursive = value;
        self
    }

    pub fn include_input(mut self, value: bool) -> Self {
        self.include_input = value;
        self
    }

    pub fn simplify(mut self, value: bool) -> Self {
        self.simplify = value;
        self
    }

    pub fn return_index(mut self, value: bool) -> Self {
        self.return_index = value;
        self
    }

    pub fn missing_as_na(mut self, value: bool) -> Self {
        self.missing_as_na = value;
        self
    }
}

/// One element of a traversal result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxonHit {
    /// A taxon identifier
    Taxon(TaxonId),
    /// A position in the global taxon table (`return_index` output)
    Index(usize),
    /// Marker for a root's empty ancestor chain (`missing_as_na` output)
    Missing,
}

/// Result of a traversal query: per-taxon mapping or flattened sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalOutput {
    /// One result sequence per queried taxon, keyed in query order
    PerTaxon(IndexMap<TaxonId, Vec<TaxonHit>>),
    /// All per-taxon results concatenated in query order
    Flat(Vec<TaxonHit>),
}

impl TraversalOutput {
    /// Result sequence for one queried taxon (`PerTaxon` shape only)
    pub fn get(&self, id: TaxonId) -> Option<&[TaxonHit]> {
        match self {
            Self::PerTaxon(map) => map.get(&id).map(|v| v.as_slice()),
            Self::Flat(_) => None,
        }
    }

    /// All hits in output order, regardless of shape
    pub fn flatten(self) -> Vec<TaxonHit> {
        match self {
            Self::PerTaxon(map) => map.into_values().flatten().collect(),
            Self::Flat(hits) => hits,
        }
    }

    /// Taxon ids among the hits, in output order. Index and missing
    /// markers are skipped.
    pub fn taxon_ids(&self) -> Vec<TaxonId> {
        let hits: Box<dyn Iterator<Item = &TaxonHit>> = match self {
            Self::PerTaxon(map) => Box::new(map.values().flatten()),
            Self::Flat(hits) => Box::new(hits.iter()),
        };
        hits.filter_map(|hit| match hit {
            TaxonHit::Taxon(id) => Some(*id),
            _ => None,
        })
        .collect()
    }
}

/// Ancestors ("supertaxa") of each queried taxon, nearest first, root last.
///
/// Non-recursive queries return only the immediate parent. Querying an
/// unknown id fails with a lookup error; a root's chain is empty unless
/// `missing_as_na` turns it into a single [`TaxonHit::Missing`].
pub fn supertaxa(
    tree: &TaxonomyTree,
    taxa: &[TaxonId],
    options: &TraversalOptions,
) -> TaxmapResult<TraversalOutput> {
    let mut results = IndexMap::with_capacity(taxa.len());
    for &id in taxa {
        let chain = ancestors_of(tree, id, options.recursive)?;
        results.insert(id, shape_hits(tree, id, chain, options, true));
    }
    Ok(finish(results, options))
}

/// Descendants ("subtaxa") of each queried taxon, depth-first pre-order,
/// visiting children in stored order.
///
/// Non-recursive queries return only the immediate children. A leaf's
/// descendant list is always empty.
pub fn subtaxa(
    tree: &TaxonomyTree,
    taxa: &[TaxonId],
    options: &TraversalOptions,
) -> TaxmapResult<TraversalOutput> {
    let mut results = IndexMap::with_capacity(taxa.len());
    for &id in taxa {
        let mut found = Vec::new();
        if options.recursive {
            descendants_of(tree, id, &mut found)?;
        } else {
            found.extend_from_slice(tree.children(id)?);
        }
        results.insert(id, shape_hits(tree, id, found, options, false));
    }
    Ok(finish(results, options))
}

fn ancestors_of(tree: &TaxonomyTree, id: TaxonId, recursive: bool) -> TaxmapResult<Vec<TaxonId>> {
    let mut chain = Vec::new();
    let mut current = tree.parent(id)?;
    while let Some(parent) = current {
        chain.push(parent);
        if !recursive {
            break;
        }
        current = tree.parent(parent)?;
    }
    Ok(chain)
}

// Pre-order: each child's subtree is fully expanded before its next sibling
fn descendants_of(tree: &TaxonomyTree, id: TaxonId, out: &mut Vec<TaxonId>) -> TaxmapResult<()> {
    for &child in tree.children(id)? {
        out.push(child);
        descendants_of(tree, child, out)?;
    }
    Ok(())
}

fn shape_hits(
    tree: &TaxonomyTree,
    input: TaxonId,
    found: Vec<TaxonId>,
    options: &TraversalOptions,
    allow_na: bool,
) -> Vec<TaxonHit> {
    let mut hits = Vec::with_capacity(found.len() + 1);
    if options.include_input {
        hits.push(TaxonHit::Taxon(input));
    }
    if found.is_empty() && allow_na && options.missing_as_na {
        hits.push(TaxonHit::Missing);
    } else {
        hits.extend(found.into_iter().map(TaxonHit::Taxon));
    }
    if options.return_index {
        for hit in &mut hits {
            if let TaxonHit::Taxon(id) = hit {
                // Ids in hits always come from the table, so the index exists
                if let Some(index) = tree.index_of(*id) {
                    *hit = TaxonHit::Index(index);
                }
            }
        }
    }
    hits
}

fn finish(results: IndexMap<TaxonId, Vec<TaxonHit>>, options: &TraversalOptions) -> TraversalOutput {
    if options.simplify {
        TraversalOutput::Flat(results.into_values().flatten().collect())
    } else {
        TraversalOutput::PerTaxon(results)
    }
}
