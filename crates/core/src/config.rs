//! Application configuration: layered defaults, config file and environment.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::LayoutError,
    layout::{Layout, DEFAULT_LAYOUT},
    save::SaveManager,
};

/// Directory under the user's config directory holding our files.
pub const CONFIG_DIR: &str = "pegsol";
/// Name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `PEGSOL_LAYOUT=european`.
pub const ENV_PREFIX: &str = "PEGSOL";

const DEFAULT_CONFIG: &str = r#"# pegsol configuration

# Layout to play: "english", "european" or the name of a custom layout below.
layout = "english"

# Where saved boards are written. Defaults to <config dir>/pegsol/saves.
# save_dir = "/home/me/.config/pegsol/saves"

# Custom layouts use '*' for a peg, 'o' for a hole and '-' or spaces outside the board.
# A target makes the layout win on an exact match; without one the last peg wins.
#
# [[layouts]]
# name = "diamond"
# minimum_moves = 10
# start = """
#   *
#  ***
# **o**
#  ***
#   *
# """
"#;

/// A layout defined in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Name used to select the layout.
    pub name: String,
    /// Starting position in layout symbols.
    pub start: String,
    /// Optional winning position in layout symbols.
    #[serde(default)]
    pub target: Option<String>,
    /// Optional minimum number of jumps for a genuine solution.
    #[serde(default)]
    pub minimum_moves: Option<u32>,
}

impl LayoutConfig {
    /// Parse into a playable layout.
    pub fn to_layout(&self) -> Result<Layout, LayoutError> {
        Layout::parse(
            self.name.clone(),
            &self.start,
            self.target.as_deref(),
            self.minimum_moves,
        )
    }
}

/// Resolved application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name of the layout to play.
    pub layout: String,
    /// Directory for save files.
    pub save_dir: PathBuf,
    /// Custom layouts, consulted before the built-in ones.
    #[serde(default)]
    pub layouts: Vec<LayoutConfig>,
}

impl AppConfig {
    /// Directory holding the configuration file.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
    }

    /// Default path of the configuration file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Load settings from the default config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path` (which may be missing) and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        let default_save_dir = SaveManager::default_root();
        let settings = Config::builder()
            .set_default("layout", DEFAULT_LAYOUT)?
            .set_default("save_dir", default_save_dir.to_string_lossy().to_string())?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse configuration from {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the configured layout, preferring custom layouts over built-ins.
    pub fn layout(&self) -> Result<Layout, LayoutError> {
        let wanted = self.layout.trim();
        match self
            .layouts
            .iter()
            .find(|layout| layout.name.eq_ignore_ascii_case(wanted))
        {
            Some(custom) => custom.to_layout(),
            None => Layout::builtin(wanted),
        }
    }
}

/// Write the commented default config file when none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = AppConfig::config_path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write the commented default config file at `path` unless it already exists.
/// Returns whether a file was written.
pub fn ensure_default_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(true)
}
