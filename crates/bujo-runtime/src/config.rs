use crate::{Error, Result};
use bujo_types::SignifierMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolve the journal directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. BUJO_PATH environment variable (with tilde expansion)
/// 3. System data directory (recommended default)
/// 4. ~/.bujo (fallback for systems without a standard data directory)
pub fn resolve_journal_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Explicit path
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    // Priority 2: BUJO_PATH environment variable
    if let Ok(env_path) = std::env::var("BUJO_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    // Priority 3: System data directory (recommended default)
    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("bujo"));
    }

    // Priority 4: Fallback to ~/.bujo (last resort)
    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".bujo"));
    }

    Err(Error::Config(
        "Could not determine journal path: no HOME directory or system data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Run an incremental reindex when the journal is opened.
    #[serde(default = "default_true")]
    pub auto_reindex: bool,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { auto_reindex: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_collection_types() -> Vec<String> {
    vec![
        "projects".to_string(),
        "trackers".to_string(),
        "lists".to_string(),
    ]
}

fn default_signifiers() -> HashMap<String, String> {
    [
        ("*", "priority"),
        ("!", "inspiration"),
        ("?", "explore"),
        ("@", "waiting"),
        ("#", "delegated"),
    ]
    .into_iter()
    .map(|(c, name)| (c.to_string(), name.to_string()))
    .collect()
}

/// Journal configuration.
///
/// Paths are derived from the journal directory; the persisted `config.toml`
/// carries only the tunable sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub journal_dir: PathBuf,
    #[serde(skip)]
    pub data_dir: PathBuf,
    #[serde(skip)]
    pub cache_db: PathBuf,

    #[serde(default)]
    pub index: IndexSettings,

    #[serde(default = "default_collection_types")]
    pub collection_types: Vec<String>,

    /// Signifier character -> name table, validated when materialized.
    #[serde(default = "default_signifiers")]
    pub signifiers: HashMap<String, String>,
}

impl Config {
    /// Default configuration rooted at a journal directory.
    pub fn for_dir(journal_dir: impl Into<PathBuf>) -> Self {
        let journal_dir = journal_dir.into();
        Self {
            data_dir: journal_dir.join("data"),
            cache_db: journal_dir.join("cache.db"),
            journal_dir,
            index: IndexSettings::default(),
            collection_types: default_collection_types(),
            signifiers: default_signifiers(),
        }
    }

    /// Load configuration for a journal directory; a missing `config.toml`
    /// yields defaults.
    pub fn load(journal_dir: impl Into<PathBuf>) -> Result<Self> {
        let journal_dir = journal_dir.into();
        let config_path = journal_dir.join("config.toml");
        Self::load_from(journal_dir, &config_path)
    }

    pub fn load_from(journal_dir: PathBuf, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::for_dir(journal_dir));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.data_dir = journal_dir.join("data");
        config.cache_db = journal_dir.join("cache.db");
        config.journal_dir = journal_dir;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = self.journal_dir.join("config.toml");
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Materialize the validated signifier table.
    pub fn signifier_map(&self) -> Result<SignifierMap> {
        Ok(SignifierMap::from_config(&self.signifiers)?)
    }
}
