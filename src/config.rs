//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/classtree/classtree.toml`
//! 3. Environment variables: `CLASSTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Fallback glyph when a category has no configured icon.
pub const DEFAULT_ICON: &str = "•";

/// Unified configuration for classtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Path to the JSON record store
    pub store_path: PathBuf,
    /// Tenant/partition scope to operate in
    pub domain: String,
    /// Classification family to operate on
    pub kind: String,
    /// Category name -> icon reference
    pub icons: BTreeMap<String, String>,
    /// Icon used when a category has no mapping
    pub fallback_icon: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("classifications.json"),
            domain: "DOMAIN_A".to_string(),
            kind: "TASK".to_string(),
            icons: BTreeMap::new(),
            fallback_icon: DEFAULT_ICON.to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (everything optional so layers
/// can be merged field by field).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    store_path: Option<PathBuf>,
    domain: Option<String>,
    kind: Option<String>,
    icons: Option<BTreeMap<String, String>>,
    fallback_icon: Option<String>,
}

/// Get the XDG config directory for classtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "classtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("classtree.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Resolve a category to its icon reference; unknown categories get the
    /// configured fallback. Pure lookup, no I/O.
    pub fn icon_for(&self, category: &str) -> &str {
        self.icons
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.fallback_icon)
    }

    /// Merge overlay config onto self; overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            store_path: overlay
                .store_path
                .clone()
                .unwrap_or_else(|| self.store_path.clone()),
            domain: overlay
                .domain
                .clone()
                .unwrap_or_else(|| self.domain.clone()),
            kind: overlay.kind.clone().unwrap_or_else(|| self.kind.clone()),
            icons: overlay.icons.clone().unwrap_or_else(|| self.icons.clone()),
            fallback_icon: overlay
                .fallback_icon
                .clone()
                .unwrap_or_else(|| self.fallback_icon.clone()),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = shellexpand::full(self.store_path.to_string_lossy().as_ref())
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| self.store_path.to_string_lossy().into_owned());
        self.store_path = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/classtree/classtree.toml`
    /// 3. Environment variables: `CLASSTREE_*` prefix
    pub fn load() -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply CLASSTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder =
            Config::builder().add_source(Environment::with_prefix("CLASSTREE").separator("__"));
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("store_path") {
            settings.store_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("domain") {
            settings.domain = val;
        }
        if let Ok(val) = config.get_string("kind") {
            settings.kind = val;
        }
        if let Ok(val) = config.get_string("fallback_icon") {
            settings.fallback_icon = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# classtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/classtree/classtree.toml
#   Env:    CLASSTREE_* environment variables (explicit overrides)

# Path to the JSON record store
# store_path = "classifications.json"

# Tenant/partition scope
# domain = "DOMAIN_A"

# Classification family
# kind = "TASK"

# Icon used for categories without a mapping
# fallback_icon = "•"

# Category name -> icon reference
# [icons]
# MANUAL = "🔧"
# EXTERNAL = "🌐"
# AUTOMATIC = "⚙"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
