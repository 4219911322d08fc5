//! Schema catalogue: configuration trees bound to a device type and command.
//!
//! A schema file is a JSON array:
//!
//! ```json
//! [
//!   {
//!     "command": "show interface",
//!     "hw_type": "isr4000",
//!     "sw_type": "ios-xe",
//!     "sw_version": ["16.*", "17.*"],
//!     "prompt": "#",
//!     "config": [ { "match": "...", "level": 0, "submatch": [] } ]
//!   }
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parser::parse;
use crate::record::{LabelScheme, Record};
use crate::tree::{compile, ConfigNode, PatternTree};
use crate::{Error, Result};

/// A configuration tree together with the context it applies to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schema {
    /// Command whose output this schema parses.
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub hw_type: String,
    #[serde(default)]
    pub sw_type: String,
    /// Glob patterns of supported software versions. Empty means any.
    #[serde(default)]
    pub sw_version: Vec<String>,
    /// Marker that ends the device prompt (e.g. `#` or `>`).
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub config: Vec<ConfigNode>,
}

impl Schema {
    /// Whether this schema applies to `query`.
    pub fn applies_to(&self, query: &SchemaQuery) -> bool {
        if normalize_command(&self.command) != normalize_command(&query.command) {
            return false;
        }
        if !field_matches(&self.hw_type, query.hw_type.as_deref()) {
            return false;
        }
        if !field_matches(&self.sw_type, query.sw_type.as_deref()) {
            return false;
        }
        match query.sw_version.as_deref() {
            Some(version) if !self.sw_version.is_empty() => self
                .sw_version
                .iter()
                .any(|pattern| glob_match::glob_match(pattern, version)),
            _ => true,
        }
    }

    /// Device name taken from the first prompt line of `text`.
    ///
    /// Returns `None` when no prompt marker is configured or no line
    /// carries one.
    pub fn device_name<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.prompt.is_empty() {
            return None;
        }
        text.lines()
            .filter_map(|line| line.find(self.prompt.as_str()).map(|pos| line[..pos].trim()))
            .find(|name| !name.is_empty() && !name.contains(char::is_whitespace))
    }

    /// Compile the schema's configuration tree.
    pub fn compile(&self) -> Result<CompiledSchema> {
        Ok(CompiledSchema {
            schema: self.clone(),
            tree: compile(&self.config)?,
        })
    }
}

fn normalize_command(cmd: &str) -> String {
    cmd.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn field_matches(expected: &str, actual: Option<&str>) -> bool {
    match actual {
        Some(actual) if !expected.is_empty() && !actual.is_empty() => expected == actual,
        _ => true,
    }
}

/// Selector for looking up a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaQuery {
    pub command: String,
    pub hw_type: Option<String>,
    pub sw_type: Option<String>,
    pub sw_version: Option<String>,
}

impl SchemaQuery {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }
}

/// A schema with its tree compiled, ready for repeated parsing.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    schema: Schema,
    tree: PatternTree,
}

impl CompiledSchema {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn tree(&self) -> &PatternTree {
        &self.tree
    }

    /// Parse `text` with this schema's tree.
    pub fn parse(
        &self,
        text: &str,
        max_level: i64,
        bucket: &str,
        scheme: &LabelScheme,
    ) -> Vec<Record> {
        parse(text, &self.tree, max_level, bucket, scheme)
    }
}

/// All schemas from one catalogue, in file order.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: Vec<Schema>,
}

impl SchemaSet {
    pub fn from_schemas(schemas: Vec<Schema>) -> Self {
        Self { schemas }
    }

    /// Load a schema catalogue from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_schemas(read_schemas(path)?))
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// First schema that applies to `query`.
    pub fn find(&self, query: &SchemaQuery) -> Option<&Schema> {
        let found = self.schemas.iter().find(|s| s.applies_to(query));
        debug!(command = query.command.as_str(), found = found.is_some(), "schema lookup");
        found
    }

    /// Like [`find`](Self::find), but a missing schema is an error.
    pub fn require(&self, query: &SchemaQuery) -> Result<&Schema> {
        self.find(query)
            .ok_or_else(|| Error::NotFound(format!("no schema for command '{}'", query.command)))
    }
}

/// Read a JSON array of configuration nodes.
pub fn read_config(path: &Path) -> Result<Vec<ConfigNode>> {
    read_json(path)
}

/// Read a JSON array of schemas.
pub fn read_schemas(path: &Path) -> Result<Vec<Schema>> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
