//! Runtime configuration.
//!
//! The data directory comes from `ZENITH_HOME` when set, otherwise
//! `~/.zenith`. An optional `config.json` inside it overrides the default
//! list filter and sort order; every field is optional.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::service::query::{SortStrategy, TaskFilter};

pub const HOME_ENV: &str = "ZENITH_HOME";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_DIR_NAME: &str = ".zenith";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
struct Settings {
    default_filter: TaskFilter,
    default_sort: SortStrategy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub default_filter: TaskFilter,
    pub default_sort: SortStrategy,
}

impl Config {
    pub fn default_data_dir() -> Result<PathBuf> {
        if let Ok(dir) = env::var(HOME_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(home_dir.join(DEFAULT_DIR_NAME))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_data_dir()?)
    }

    /// Reads `config.json` from `data_dir`. A missing file yields defaults;
    /// a malformed one is an error.
    pub fn load_from(data_dir: PathBuf) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let settings = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            serde_json::from_str::<Settings>(&content)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?
        } else {
            Settings::default()
        };
        debug!(data_dir = %data_dir.display(), ?settings, "configuration loaded");

        Ok(Config {
            data_dir,
            default_filter: settings.default_filter,
            default_sort: settings.default_sort,
        })
    }
}
