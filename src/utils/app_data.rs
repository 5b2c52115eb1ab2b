use crate::search::{SearchSettings, DEFAULT_CLASS_MENU, DEFAULT_PACKAGE_MENU};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "jdsearch";
const CONFIG_FILE: &str = "config.json";
const CATALOGS_DIR: &str = "catalogs";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Open the top URL in the browser whenever it changes
    #[serde(default = "default_auto_open")]
    pub auto_open: bool,

    /// Add a record for every package when importing a catalog
    #[serde(default = "default_include_packages")]
    pub include_packages: bool,

    /// Command menu shown for classes
    #[serde(default = "default_class_menu")]
    pub class_menu: String,

    /// Command menu shown for packages
    #[serde(default = "default_package_menu")]
    pub package_menu: String,

    /// Number of parsed documentation pages kept in memory
    #[serde(default = "default_member_cache_size")]
    pub member_cache_size: usize,
}

fn default_auto_open() -> bool {
    false
}

fn default_include_packages() -> bool {
    true
}

fn default_class_menu() -> String {
    DEFAULT_CLASS_MENU.to_string()
}

fn default_package_menu() -> String {
    DEFAULT_PACKAGE_MENU.to_string()
}

fn default_member_cache_size() -> usize {
    64
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auto_open: default_auto_open(),
            include_packages: default_include_packages(),
            class_menu: default_class_menu(),
            package_menu: default_package_menu(),
            member_cache_size: default_member_cache_size(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
            let config: AppConfig =
                serde_json::from_str(&content).context("Failed to parse config file")?;
            debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content).context("Failed to write config file")?;
        debug!(path = %config_path.display(), "saved config");
        Ok(())
    }

    /// Settings handed to the search orchestrator
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            class_menu: self.class_menu.clone(),
            package_menu: self.package_menu.clone(),
            member_cache_size: self.member_cache_size,
        }
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create {}", app_dir.display()))?;
    Ok(app_dir)
}

/// Directory holding every imported catalog
pub fn get_catalogs_dir() -> Result<PathBuf> {
    let catalogs_dir = get_app_data_dir()?.join(CATALOGS_DIR);
    fs::create_dir_all(&catalogs_dir)?;
    Ok(catalogs_dir)
}

/// Catalog file for `docs_root` inside `catalogs_dir`
pub fn catalog_file_in(catalogs_dir: &Path, docs_root: &Path) -> PathBuf {
    catalogs_dir.join(format!("{}.json", hash_path(docs_root)))
}

/// Hash a path to create a unique file name
/// Format: first 16 chars of dir name + hash
fn hash_path(path: &Path) -> String {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let path_str = canonical.to_string_lossy();

    let dir_name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let sanitized: String = dir_name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(16)
        .collect();

    let mut hasher = DefaultHasher::new();
    path_str.hash(&mut hasher);
    let hash = hasher.finish();

    format!("{}-{:016x}", sanitized, hash)
}
