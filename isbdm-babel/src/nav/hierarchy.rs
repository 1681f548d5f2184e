//! Rebuild the sidebar tree from flat, position-ordered rows.
//!
//! The algorithm makes two passes:
//!
//! 1. Last-sibling flags. An entry is the last of its siblings when the next entry at the same
//!    or a shallower depth is missing or strictly shallower. A monotonic stack walked from the
//!    end finds that next entry for every row in one pass.
//! 2. Ancestor flags. A stack of booleans indexed by `depth - 1` holds the last-sibling flag of
//!    the open ancestor at each level. Before each entry the stack is cut (or padded with `true`)
//!    to `depth - 1` slots and copied into the entry, then the entry's own flag is pushed.
//!
//! Padding covers sections whose rows start below depth 1: the missing outer levels draw as
//! closed ancestors.

use super::{NavEntry, RawNavEntry};
use crate::error::BabelError;

/// Compute depth, sibling and ancestor flags for one section's rows.
///
/// `raw` must already be sorted by position. The absolute depth of a row is
/// `base_depth + local_indent` and must be at least 1.
pub fn reconstruct(raw: Vec<RawNavEntry>, base_depth: i64) -> Result<Vec<NavEntry>, BabelError> {
    let depths = raw
        .iter()
        .map(|entry| absolute_depth(entry, base_depth))
        .collect::<Result<Vec<_>, _>>()?;

    let last_flags = last_sibling_flags(&depths);

    let mut open_ancestors: Vec<bool> = Vec::new();
    let mut entries = Vec::with_capacity(raw.len());
    for (index, entry) in raw.into_iter().enumerate() {
        let depth = depths[index];
        open_ancestors.resize(depth - 1, true);
        let ancestor_is_last = open_ancestors.clone();
        open_ancestors.push(last_flags[index]);

        let has_children = depths.get(index + 1).is_some_and(|next| *next > depth);

        entries.push(NavEntry {
            source_reference: entry.source_reference,
            normalized_key: entry.normalized_key,
            label: entry.label,
            original_href: entry.original_href,
            absolute_depth: depth,
            position: entry.position,
            is_last_sibling: last_flags[index],
            ancestor_is_last,
            has_children,
        });
    }

    Ok(entries)
}

fn absolute_depth(entry: &RawNavEntry, base_depth: i64) -> Result<usize, BabelError> {
    let indent = i64::try_from(entry.local_indent).unwrap_or(i64::MAX);
    let depth = base_depth.saturating_add(indent);
    if depth < 1 {
        return Err(BabelError::InvalidDepth {
            section: entry.source_reference.clone(),
            depth,
        });
    }
    usize::try_from(depth).map_err(|_| BabelError::InvalidDepth {
        section: entry.source_reference.clone(),
        depth,
    })
}

fn last_sibling_flags(depths: &[usize]) -> Vec<bool> {
    let mut flags = vec![true; depths.len()];
    // indices of later entries, depths strictly increasing from bottom to top
    let mut stack: Vec<usize> = Vec::new();
    for index in (0..depths.len()).rev() {
        while stack.last().is_some_and(|&later| depths[later] > depths[index]) {
            stack.pop();
        }
        if let Some(&next) = stack.last() {
            flags[index] = depths[next] < depths[index];
        }
        stack.push(index);
    }
    flags
}
