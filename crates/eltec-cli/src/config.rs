//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file contents; every table and key is optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub io: IoConfig,
    pub wikidata: WikidataConfig,
    pub columns: ColumnsConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct IoConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WikidataConfig {
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
    pub lang: Option<String>,
    pub delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub work_class: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ColumnsConfig {
    pub author_name: Option<String>,
    pub author_ids: Option<String>,
    pub title: Option<String>,
    pub title_ids: Option<String>,
}

impl FileConfig {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./eltec-enrich.toml (current directory)
    /// 2. ~/.config/eltec-enrich/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("eltec-enrich.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(dirs) = directories::ProjectDirs::from("", "", "eltec-enrich") {
            let user_config = dirs.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Overlay file values onto `base`.
    pub fn apply(self, base: &mut eltec_wikidata::Config) {
        let Self {
            io,
            wikidata,
            columns,
        } = self;

        if let Some(v) = io.input {
            base.input = v;
        }
        if let Some(v) = io.output {
            base.output = v;
        }
        if let Some(v) = wikidata.endpoint {
            base.endpoint = v;
        }
        if let Some(v) = wikidata.user_agent {
            base.user_agent = v;
        }
        if let Some(v) = wikidata.lang {
            base.lang = v;
        }
        if let Some(ms) = wikidata.delay_ms {
            base.delay = Duration::from_millis(ms);
        }
        if let Some(secs) = wikidata.timeout_secs {
            base.timeout = Duration::from_secs(secs);
        }
        if let Some(v) = wikidata.work_class {
            base.work_class = v;
        }
        if let Some(v) = columns.author_name {
            base.columns.author_name = v;
        }
        if let Some(v) = columns.author_ids {
            base.columns.author_ids = v;
        }
        if let Some(v) = columns.title {
            base.columns.title = v;
        }
        if let Some(v) = columns.title_ids {
            base.columns.title_ids = v;
        }
    }
}
