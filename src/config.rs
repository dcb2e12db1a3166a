use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::DEFAULT_TOP_N;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "IPL_DASHBOARD_CONFIG";
/// Environment variable overriding the data file path.
pub const DATA_ENV: &str = "IPL_DASHBOARD_DATA";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so a config file only needs
/// the keys it changes:
///
/// ```json
/// { "data_path": "data/ipl_2008_2023.csv", "recent_seasons": 3 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Match file opened at startup.
    pub data_path: PathBuf,
    /// How many of the most recent seasons are preselected.
    pub recent_seasons: usize,
    /// Leaderboard length.
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/matches.csv"),
            recent_seasons: 5,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Layer the sources: defaults, then the config file, then the data-path
    /// environment variable, then the command-line argument.
    pub fn resolve(
        config_file: Option<&Path>,
        data_env: Option<String>,
        cli_path: Option<String>,
    ) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(path) = cli_path.or(data_env).filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        Ok(config)
    }

    /// Resolve from the process environment and arguments.
    pub fn from_env() -> Result<Self> {
        let config_file = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::resolve(
            config_file.as_deref(),
            std::env::var(DATA_ENV).ok(),
            std::env::args().nth(1),
        )
    }
}
