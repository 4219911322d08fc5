//! Command implementations for cliscrape.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use scrape::config::resolve_root;
use scrape::{
    compile, read_config, Config, Error, LabelScheme, PatternTree, Record, SchemaQuery, SchemaSet,
};
use tracing::{debug, info};

use crate::TreeSource;

/// Schema selection flags.
pub struct Selector {
    pub command: Option<String>,
    pub hw_type: Option<String>,
    pub sw_type: Option<String>,
    pub sw_version: Option<String>,
}

/// Options for the parse command.
pub struct ParseOptions {
    pub level: Option<i64>,
    pub bucket: Option<String>,
    pub labels: Vec<String>,
    pub keys: Vec<String>,
    pub pretty: bool,
}

/// A compiled tree and the device name found for it, if any.
struct ResolvedTree {
    tree: PatternTree,
    device: Option<String>,
}

pub fn parse(
    file: Option<&str>,
    source: &TreeSource,
    selector: &Selector,
    opts: &ParseOptions,
) -> scrape::Result<()> {
    let config = Config::load()?;
    let text = read_input(file)?;
    let resolved = resolve_tree(&config, source, selector, &text)?;

    let level = opts.level.unwrap_or(config.max_level);
    let bucket = opts.bucket.as_deref().unwrap_or(&config.bucket);
    let prefix = label_prefix(&opts.labels, resolved.device);
    debug!(level, bucket, ?prefix, "parsing input");

    let scheme = LabelScheme::new(prefix, opts.keys.iter().cloned());
    let records = scrape::parse(&text, &resolved.tree, level, bucket, &scheme);
    info!(records = records.len(), "parsed input");

    println!("{}", render_records(&records, opts.pretty)?);
    Ok(())
}

pub fn check(source: &TreeSource) -> scrape::Result<()> {
    if let Some(path) = &source.config {
        let tree = compile(&read_config(Path::new(path))?)?;
        println!("{}: {} patterns ({} top-level)", path, tree.node_count(), tree.len());
        return Ok(());
    }

    let path = schema_path(source.schema.as_deref())?;
    let set = SchemaSet::load(&path)?;
    for schema in set.schemas() {
        let compiled = schema.compile()?;
        println!(
            "{} [{}]: {} patterns",
            schema.command,
            describe_target(&schema.hw_type, &schema.sw_type),
            compiled.tree().node_count()
        );
    }
    println!("{} schemas OK", set.schemas().len());
    Ok(())
}

pub fn schemas(schema: Option<&str>) -> scrape::Result<()> {
    let path = schema_path(schema)?;
    let set = SchemaSet::load(&path)?;

    if set.schemas().is_empty() {
        println!("No schemas in {}", path.display());
        return Ok(());
    }

    println!("{:<30} {:<20} {:<15} VERSIONS", "COMMAND", "TARGET", "PROMPT");
    for schema in set.schemas() {
        let versions = if schema.sw_version.is_empty() {
            "*".to_string()
        } else {
            schema.sw_version.join(",")
        };
        println!(
            "{:<30} {:<20} {:<15} {}",
            schema.command,
            describe_target(&schema.hw_type, &schema.sw_type),
            schema.prompt,
            versions
        );
    }
    Ok(())
}

pub fn init(force: bool) -> scrape::Result<()> {
    // The existing file is not parsed, so --force can replace a corrupt one.
    let config = Config::with_root(resolve_root()?);
    let path = config.config_path();

    if path.exists() && !force {
        println!("Config already exists at {} (use --force to overwrite)", path.display());
        return Ok(());
    }

    config.save()?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn resolve_tree(
    config: &Config,
    source: &TreeSource,
    selector: &Selector,
    text: &str,
) -> scrape::Result<ResolvedTree> {
    if let Some(path) = &source.config {
        let tree = compile(&read_config(Path::new(path))?)?;
        return Ok(ResolvedTree { tree, device: None });
    }

    let command = selector.command.clone().ok_or_else(|| {
        Error::Config("--command is required when parsing with a schema catalogue".to_string())
    })?;
    let query = SchemaQuery {
        command,
        hw_type: selector.hw_type.clone(),
        sw_type: selector.sw_type.clone(),
        sw_version: selector.sw_version.clone(),
    };

    let path = match &source.schema {
        Some(path) => PathBuf::from(path),
        None => config.schema_path(),
    };
    let set = SchemaSet::load(&path)?;
    let schema = set.require(&query)?;
    let compiled = schema.compile()?;

    Ok(ResolvedTree {
        device: schema.device_name(text).map(str::to_string),
        tree: compiled.tree().clone(),
    })
}

/// Explicit labels, else the device name, else this host's name.
fn label_prefix(labels: &[String], device: Option<String>) -> Vec<String> {
    if !labels.is_empty() {
        return labels.to_vec();
    }
    let name = device.unwrap_or_else(|| gethostname::gethostname().to_string_lossy().to_string());
    vec![name]
}

fn schema_path(explicit: Option<&str>) -> scrape::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(Config::load()?.schema_path()),
    }
}

fn describe_target(hw_type: &str, sw_type: &str) -> String {
    match (hw_type.is_empty(), sw_type.is_empty()) {
        (true, true) => "any".to_string(),
        (false, true) => hw_type.to_string(),
        (true, false) => sw_type.to_string(),
        (false, false) => format!("{}/{}", hw_type, sw_type),
    }
}

/// Device output is not guaranteed to be UTF-8; invalid bytes are replaced.
fn read_input(file: Option<&str>) -> scrape::Result<String> {
    let bytes = match file {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn render_records(records: &[Record], pretty: bool) -> scrape::Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    };
    rendered.map_err(|e| Error::Config(format!("Failed to serialize records: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefix_prefers_explicit_labels() {
        let labels = vec!["site".to_string(), "gw1".to_string()];
        assert_eq!(label_prefix(&labels, Some("other".to_string())), labels);
    }

    #[test]
    fn test_label_prefix_uses_device_name() {
        assert_eq!(label_prefix(&[], Some("gw1".to_string())), vec!["gw1".to_string()]);
    }

    #[test]
    fn test_label_prefix_falls_back_to_hostname() {
        let prefix = label_prefix(&[], None);
        assert_eq!(prefix.len(), 1);
        assert_eq!(prefix[0], gethostname::gethostname().to_string_lossy());
    }

    #[test]
    fn test_read_input_replaces_invalid_utf8() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("input.txt");
        std::fs::write(&path, b"gw1#show ver\n\xff caf\xe9\n").unwrap();

        let text = read_input(path.to_str()).unwrap();
        assert!(text.starts_with("gw1#show ver\n"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_describe_target() {
        assert_eq!(describe_target("", ""), "any");
        assert_eq!(describe_target("isr4000", ""), "isr4000");
        assert_eq!(describe_target("isr4000", "ios-xe"), "isr4000/ios-xe");
    }
}
