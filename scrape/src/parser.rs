//! Match, merge and format in one call.

use crate::matcher::match_text;
use crate::merge::merge_depths;
use crate::record::{format_records, LabelScheme, Record};
use crate::tree::PatternTree;

/// Parse `text` with a compiled tree into labeled records.
pub fn parse(
    text: &str,
    tree: &PatternTree,
    max_level: i64,
    bucket: &str,
    scheme: &LabelScheme,
) -> Vec<Record> {
    let branches = match_text(text, tree.roots(), max_level);
    let merged = merge_depths(&branches);
    format_records(&merged, bucket, scheme)
}
