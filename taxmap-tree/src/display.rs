//! ASCII rendering of a taxon's subtree with observation counts

use taxmap_core::{TaxmapResult, TaxonId};

use crate::map::TaxonomyMap;

/// Format a taxon's subtree as an ASCII tree
///
/// Each line shows the taxon name, its rank label if present, the number
/// of directly attached observations, and the cumulative count including
/// all descendants.
pub fn format_tree(
    map: &TaxonomyMap,
    root: TaxonId,
    max_depth: Option<usize>,
) -> TaxmapResult<String> {
    let mut result = String::new();
    format_node(map, root, "", true, max_depth, 0, &mut result)?;
    Ok(result)
}

fn format_node(
    map: &TaxonomyMap,
    taxon: TaxonId,
    prefix: &str,
    is_last: bool,
    max_depth: Option<usize>,
    current_depth: usize,
    result: &mut String,
) -> TaxmapResult<()> {
    let node = map.tree().taxon(taxon)?;

    if current_depth > 0 {
        result.push_str(prefix);
        if is_last {
            result.push_str("└── ");
        } else {
            result.push_str("├── ");
        }
    }

    let rank = node.rank.as_deref().unwrap_or("no rank");
    result.push_str(&format!(
        "{} [{}] ({} obs, {} total)\n",
        node.name,
        rank,
        map.obs_count(taxon)?,
        map.subtree_obs_count(taxon)?
    ));

    let children = node.children();
    if let Some(max) = max_depth {
        if current_depth >= max {
            if !children.is_empty() {
                result.push_str(&format!("{}    ... ({} children)\n", prefix, children.len()));
            }
            return Ok(());
        }
    }

    let child_count = children.len();
    for (i, &child) in children.iter().enumerate() {
        let is_last_child = i == child_count - 1;
        let child_prefix = if current_depth == 0 {
            String::new()
        } else {
            format!("{}{}    ", prefix, if is_last { " " } else { "│" })
        };
        format_node(
            map,
            child,
            &child_prefix,
            is_last_child,
            max_depth,
            current_depth + 1,
            result,
        )?;
    }

    Ok(())
}
