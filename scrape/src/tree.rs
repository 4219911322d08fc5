//! Configuration trees and their compiled pattern trees.
//!
//! A configuration tree is plain data (usually decoded from JSON):
//!
//! ```json
//! [
//!   {
//!     "match": "(?P<interface>\\S+) is (?P<admin_status>[^,]+),[^\\n]*",
//!     "level": 0,
//!     "submatch": [
//!       { "match": "line protocol is (?P<line_status>\\w+)", "level": 1 }
//!     ]
//!   }
//! ]
//! ```
//!
//! [`compile`] turns it into a [`PatternTree`] of compiled regular
//! expressions. The compiled tree is immutable and can be shared across
//! threads and reused for any number of parse calls.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::{Error, Result};

/// One node of a configuration tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigNode {
    /// Regular expression source.
    #[serde(rename = "match")]
    pub pattern: String,

    /// Priority level. The node is only applied when its level does not
    /// exceed the caller's maximum.
    #[serde(default)]
    pub level: i64,

    /// Patterns applied to the text matched by this node.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub submatch: Vec<ConfigNode>,
}

/// `"submatch": null` is common at leaves and means the same as absent.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ConfigNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ConfigNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ConfigNode {
    /// Create a leaf node.
    pub fn new(pattern: impl Into<String>, level: i64) -> Self {
        Self {
            pattern: pattern.into(),
            level,
            submatch: Vec::new(),
        }
    }

    /// Attach a child node (builder style).
    pub fn with_submatch(mut self, child: ConfigNode) -> Self {
        self.submatch.push(child);
        self
    }
}

/// A compiled pattern with its level and child patterns.
#[derive(Debug, Clone)]
pub struct PatternNode {
    pub pattern: Regex,
    pub level: i64,
    pub children: Vec<PatternNode>,
}

impl PatternNode {
    /// Whether the pattern declares at least one named capture group.
    pub fn has_named_groups(&self) -> bool {
        self.pattern.capture_names().any(|name| name.is_some())
    }

    /// Whether this node participates when matching at `max_level`.
    pub fn is_eligible(&self, max_level: i64) -> bool {
        self.level <= max_level
    }
}

/// An ordered forest of compiled pattern nodes.
#[derive(Debug, Clone, Default)]
pub struct PatternTree {
    roots: Vec<PatternNode>,
}

impl PatternTree {
    /// Top-level nodes in declaration order.
    pub fn roots(&self) -> &[PatternNode] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[PatternNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.roots)
    }
}

/// Compile a configuration tree.
///
/// Every pattern is compiled eagerly. The first invalid pattern aborts the
/// whole build with [`Error::InvalidPattern`]; no partial tree is returned.
pub fn compile(config: &[ConfigNode]) -> Result<PatternTree> {
    let roots = compile_nodes(config)?;
    let tree = PatternTree { roots };
    info!(roots = tree.len(), nodes = tree.node_count(), "compiled pattern tree");
    Ok(tree)
}

fn compile_nodes(config: &[ConfigNode]) -> Result<Vec<PatternNode>> {
    config.iter().map(compile_node).collect()
}

fn compile_node(node: &ConfigNode) -> Result<PatternNode> {
    let pattern = Regex::new(&node.pattern).map_err(|source| Error::InvalidPattern {
        pattern: node.pattern.clone(),
        source,
    })?;

    Ok(PatternNode {
        pattern,
        level: node.level,
        children: compile_nodes(&node.submatch)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_preserves_order_and_nesting() {
        let config = vec![
            ConfigNode::new("a(?P<x>\\d)", 0)
                .with_submatch(ConfigNode::new("(?P<y>\\d)", 1))
                .with_submatch(ConfigNode::new("z", 2)),
            ConfigNode::new("b", 3),
        ];

        let tree = compile(&config).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node_count(), 4);

        let first = &tree.roots()[0];
        assert_eq!(first.pattern.as_str(), "a(?P<x>\\d)");
        assert_eq!(first.children.len(), 2);
        assert_eq!(first.children[0].level, 1);
        assert_eq!(first.children[1].pattern.as_str(), "z");
        assert!(tree.roots()[1].children.is_empty());
    }

    #[test]
    fn test_compile_rejects_invalid_pattern_anywhere() {
        let config = vec![
            ConfigNode::new("ok", 0),
            ConfigNode::new("also ok", 0).with_submatch(ConfigNode::new("(?P<broken", 1)),
        ];

        match compile(&config) {
            Err(Error::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(?P<broken"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_pattern_message_names_pattern() {
        let err = compile(&[ConfigNode::new("[unclosed", 0)]).unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_compile_empty_config() {
        let tree = compile(&[]).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn test_named_groups_detection() {
        let tree = compile(&[
            ConfigNode::new("(?P<name>\\w+)", 0),
            ConfigNode::new("(\\w+) (\\d+)", 0),
            ConfigNode::new("plain", 0),
        ])
        .unwrap();

        assert!(tree.roots()[0].has_named_groups());
        assert!(!tree.roots()[1].has_named_groups());
        assert!(!tree.roots()[2].has_named_groups());
    }

    #[test]
    fn test_decode_config_json() {
        let json = r#"[
            {"match": "(?P<a>x)", "level": 0, "submatch": [
                {"match": "y", "level": 1, "submatch": null},
                {"match": "z", "level": 2}
            ]},
            {"match": "w"}
        ]"#;
        let config: Vec<ConfigNode> = serde_json::from_str(json).unwrap();

        assert_eq!(config.len(), 2);
        assert_eq!(config[0].submatch.len(), 2);
        assert!(config[0].submatch[0].submatch.is_empty());
        assert_eq!(config[0].submatch[1].level, 2);
        assert_eq!(config[1].level, 0);
        assert!(config[1].submatch.is_empty());
    }
}
