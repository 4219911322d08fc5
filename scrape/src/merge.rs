//! Depth-aligned merging of matcher branches.

use crate::matcher::TagSet;

/// Regroup branches by position, deepest position first.
///
/// The tag set at index `d` of every branch long enough to have one is
/// concatenated (in branch order) into one tag set for depth `d`. Depths are
/// emitted from the highest index down to zero. Collection stops at the first
/// depth whose combined tag set is empty; that depth and everything past it
/// is dropped.
pub fn merge_depths(branches: &[Vec<TagSet>]) -> Vec<TagSet> {
    let max_depth = branches.iter().map(Vec::len).max().unwrap_or(0);

    let mut depths: Vec<TagSet> = Vec::with_capacity(max_depth);
    for depth in 0..max_depth {
        let combined: TagSet = branches
            .iter()
            .filter_map(|branch| branch.get(depth))
            .flat_map(|tags| tags.iter().cloned())
            .collect();

        if combined.is_empty() {
            break;
        }
        depths.push(combined);
    }

    depths.reverse();
    depths
}
