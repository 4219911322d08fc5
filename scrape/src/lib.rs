//! cliscrape: structured records from semi-structured CLI output.
//!
//! A configuration tree declares, per level, a regular expression, a priority
//! level and nested sub-patterns that only see the text their parent matched.
//! The tree is compiled once and applied to raw text to produce labeled
//! records carrying the named captures gathered along each matching path.

pub mod config;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod parser;
pub mod record;
pub mod schema;
pub mod tree;

pub use config::Config;
pub use error::{Error, Result};
pub use matcher::{match_text, Tag, TagSet};
pub use merge::merge_depths;
pub use parser::parse;
pub use record::{format_records, LabelScheme, Record};
pub use schema::{read_config, read_schemas, CompiledSchema, Schema, SchemaQuery, SchemaSet};
pub use tree::{compile, ConfigNode, PatternNode, PatternTree};
