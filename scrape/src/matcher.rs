//! Hierarchical matching of a pattern tree against text.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::tree::PatternNode;

/// One named capture group instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// All named captures of one match, in the pattern's group order.
pub type TagSet = Vec<Tag>;

/// Apply `forest` to `text`, returning one branch per contributing node.
///
/// A node is skipped with its whole subtree when its level exceeds
/// `max_level`. Children only ever see the full text of their parent's
/// match. For each match the child results are appended first, as they
/// are produced; the node's own tag sets (one per match) follow as a
/// single branch. Nodes without named groups contribute only their
/// children's results. Empty results are never appended.
pub fn match_text(text: &str, forest: &[PatternNode], max_level: i64) -> Vec<Vec<TagSet>> {
    let mut output = Vec::new();

    for node in forest {
        if !node.is_eligible(max_level) {
            trace!(
                pattern = node.pattern.as_str(),
                level = node.level,
                "skipping node above level"
            );
            continue;
        }

        let own = if node.has_named_groups() {
            capture_node(text, node, max_level, &mut output)
        } else {
            scope_node(text, node, max_level, &mut output);
            Vec::new()
        };

        if !own.is_empty() {
            output.push(own);
        }
    }

    output
}

/// Named-group node: one tag set per match, recursing into each match.
fn capture_node(
    text: &str,
    node: &PatternNode,
    max_level: i64,
    output: &mut Vec<Vec<TagSet>>,
) -> Vec<TagSet> {
    let names: Vec<&str> = node.pattern.capture_names().flatten().collect();
    let mut search = Vec::new();

    for caps in node.pattern.captures_iter(text) {
        let tags: TagSet = names
            .iter()
            .map(|&name| Tag::new(name, caps.name(name).map_or("", |m| m.as_str())))
            .collect();
        trace!(?tags, "captured");
        search.push(tags);

        let matched = caps.get(0).map_or("", |m| m.as_str());
        descend(matched, node, max_level, output);
    }

    debug!(pattern = node.pattern.as_str(), matches = search.len(), "matched node");
    search
}

/// Node without named groups: only scopes the text its children see.
fn scope_node(text: &str, node: &PatternNode, max_level: i64, output: &mut Vec<Vec<TagSet>>) {
    let mut matches = 0usize;
    for m in node.pattern.find_iter(text) {
        matches += 1;
        descend(m.as_str(), node, max_level, output);
    }
    debug!(pattern = node.pattern.as_str(), matches, "scoped node");
}

fn descend(matched: &str, node: &PatternNode, max_level: i64, output: &mut Vec<Vec<TagSet>>) {
    if node.children.is_empty() {
        return;
    }
    let result = match_text(matched, &node.children, max_level);
    debug!(branches = result.len(), "child results");
    output.extend(result.into_iter().filter(|branch| !branch.is_empty()));
}
