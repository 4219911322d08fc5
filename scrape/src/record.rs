//! Output records built from merged tag sets.

use serde::{Deserialize, Serialize};

use crate::matcher::TagSet;

/// Separator between label parts.
pub const LABEL_SEPARATOR: &str = "_";

/// A labeled output record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub label: String,
    pub bucket: String,
    pub properties: TagSet,
}

impl Record {
    /// Value of the first property named `name`.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }
}

/// How record labels are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelScheme {
    /// Fixed leading parts (e.g. the device name).
    pub prefix: Vec<String>,
    /// Tag names whose values are appended, in order.
    pub keys: Vec<String>,
}

impl LabelScheme {
    pub fn new<P, K>(prefix: P, keys: K) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            prefix: prefix.into_iter().map(Into::into).collect(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the label for one tag set.
    ///
    /// Only the first tag carrying a key is used; a key with no tag adds
    /// nothing.
    pub fn label_for(&self, tags: &TagSet) -> String {
        let mut label = self.prefix.join(LABEL_SEPARATOR);

        for key in &self.keys {
            if let Some(tag) = tags.iter().find(|tag| &tag.name == key) {
                if !label.is_empty() {
                    label.push_str(LABEL_SEPARATOR);
                }
                label.push_str(&tag.value);
            }
        }

        label
    }
}

/// Turn merged tag sets into records, preserving their order.
pub fn format_records(input: &[TagSet], bucket: &str, scheme: &LabelScheme) -> Vec<Record> {
    input
        .iter()
        .map(|tags| Record {
            label: scheme.label_for(tags),
            bucket: bucket.to_string(),
            properties: tags.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Tag;

    #[test]
    fn test_label_from_prefix_and_keys() {
        let scheme = LabelScheme::new(["router", "core"], ["interface", "unit"]);
        let tags = vec![Tag::new("unit", "0"), Tag::new("interface", "ge-0/0/1")];
        assert_eq!(scheme.label_for(&tags), "router_core_ge-0/0/1_0");
    }

    #[test]
    fn test_first_tag_wins_for_duplicate_names() {
        let scheme = LabelScheme::new(["gw"], ["interface"]);
        let tags = vec![Tag::new("interface", "Gi0/0"), Tag::new("interface", "Gi0/1")];
        assert_eq!(scheme.label_for(&tags), "gw_Gi0/0");
    }

    #[test]
    fn test_missing_key_appends_nothing() {
        let scheme = LabelScheme::new(["gw"], ["vlan", "interface"]);
        let tags = vec![Tag::new("interface", "Gi0/0")];
        assert_eq!(scheme.label_for(&tags), "gw_Gi0/0");
    }

    #[test]
    fn test_empty_prefix_has_no_leading_separator() {
        let scheme = LabelScheme::new(Vec::<String>::new(), ["a", "b"]);
        let tags = vec![Tag::new("a", "1"), Tag::new("b", "2")];
        assert_eq!(scheme.label_for(&tags), "1_2");
    }

    #[test]
    fn test_format_records_keeps_order_and_properties() {
        let input = vec![
            vec![Tag::new("name", "deep"), Tag::new("extra", "x")],
            vec![Tag::new("name", "shallow")],
        ];
        let scheme = LabelScheme::new(["dev"], ["name"]);
        let records = format_records(&input, "interfaces", &scheme);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "dev_deep");
        assert_eq!(records[0].bucket, "interfaces");
        assert_eq!(records[0].properties, input[0]);
        assert_eq!(records[0].property("extra"), Some("x"));
        assert_eq!(records[1].label, "dev_shallow");
        assert_eq!(records[1].property("extra"), None);
    }

    #[test]
    fn test_format_is_pure() {
        let input = vec![vec![Tag::new("k", "v")]];
        let scheme = LabelScheme::new(["p"], ["k"]);
        assert_eq!(
            format_records(&input, "b", &scheme),
            format_records(&input, "b", &scheme)
        );
    }
}
