//! Configuration for cliscrape.
//!
//! CLISCRAPE_ROOT resolution order:
//! 1. Explicit path passed to Config::with_root() / Config::load_from()
//! 2. CLISCRAPE_ROOT environment variable
//! 3. Default: ~/.local/share/cliscrape

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the config file inside the root directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// cliscrape configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for configuration and schema files.
    #[serde(skip)]
    pub root: PathBuf,

    /// Schema catalogue, relative to the root unless absolute.
    #[serde(default = "default_schema_file")]
    pub schema_file: PathBuf,

    /// Maximum pattern level applied when none is given.
    #[serde(default = "default_max_level")]
    pub max_level: i64,

    /// Bucket assigned to records when none is given.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Log filter used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_file() -> PathBuf {
    PathBuf::from("schema.json")
}

fn default_max_level() -> i64 {
    1
}

fn default_bucket() -> String {
    "default".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Config {
    /// Create a new config with the given root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            schema_file: default_schema_file(),
            max_level: default_max_level(),
            bucket: default_bucket(),
            log_filter: default_log_filter(),
        }
    }

    /// Load config from CLISCRAPE_ROOT/config.toml, or create default.
    pub fn load() -> Result<Self> {
        let root = resolve_root()?;
        Self::load_from(&root)
    }

    /// Load config from a specific root.
    pub fn load_from(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
            config.root = root.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::with_root(root))
        }
    }

    /// Save config to CLISCRAPE_ROOT/config.toml.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(self.config_path(), contents)?;
        Ok(())
    }

    /// Path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Path to the schema catalogue.
    pub fn schema_path(&self) -> PathBuf {
        self.root.join(&self.schema_file)
    }
}

/// Resolve the root directory using the standard resolution order.
pub fn resolve_root() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CLISCRAPE_ROOT") {
        return Ok(PathBuf::from(path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("", "", "cliscrape") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".local/share/cliscrape"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_with_root() {
        let config = Config::with_root("/tmp/test-cliscrape");
        assert_eq!(config.root, PathBuf::from("/tmp/test-cliscrape"));
        assert_eq!(config.max_level, 1);
        assert_eq!(config.bucket, "default");
        assert_eq!(config.schema_path(), PathBuf::from("/tmp/test-cliscrape/schema.json"));
    }

    #[test]
    fn test_absolute_schema_file() {
        let mut config = Config::with_root("/tmp/test-cliscrape");
        config.schema_file = PathBuf::from("/etc/cliscrape/schema.json");
        assert_eq!(config.schema_path(), PathBuf::from("/etc/cliscrape/schema.json"));
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");

        let mut config = Config::with_root(&root);
        config.max_level = 3;
        config.bucket = "interfaces".to_string();
        config.save().unwrap();

        let loaded = Config::load_from(&root).unwrap();
        assert_eq!(loaded.root, root);
        assert_eq!(loaded.max_level, 3);
        assert_eq!(loaded.bucket, "interfaces");
        assert_eq!(loaded.log_filter, "warn");
    }

    #[test]
    fn test_load_missing_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let loaded = Config::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.max_level, 1);
        assert_eq!(loaded.schema_file, PathBuf::from("schema.json"));
    }

    #[test]
    fn test_partial_config_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "max_level = 5\n").unwrap();
        let loaded = Config::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.max_level, 5);
        assert_eq!(loaded.bucket, "default");
    }

    #[test]
    fn test_invalid_config_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "max_level = \"high\"\n").unwrap();
        assert!(matches!(Config::load_from(tmp.path()), Err(Error::Config(_))));
    }
}
