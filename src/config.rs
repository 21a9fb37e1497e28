use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants;
use crate::error::{NowiError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "NOWI_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub import: ImportConfig,
    pub plss: PlssConfig,
    pub scrape: ScrapeConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub error_display_cap: usize,
    pub sheet_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlssConfig {
    pub default_county: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub delay_ms: u64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub include_contacts: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            error_display_cap: constants::DEFAULT_ERROR_DISPLAY_CAP,
            sheet_name: constants::OWNERS_SHEET.to_string(),
        }
    }
}

impl Default for PlssConfig {
    fn default() -> Self {
        Self {
            default_county: constants::GARFIELD.to_string(),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            delay_ms: 200,
            seed: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            include_contacts: true,
        }
    }
}

impl Config {
    /// Load from `$NOWI_CONFIG`, else `config.toml`; a missing default file yields the defaults.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => {
                if Path::new(DEFAULT_CONFIG_PATH).exists() {
                    Self::from_file(DEFAULT_CONFIG_PATH)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            NowiError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.import.sheet_name.trim().is_empty() {
            return Err(NowiError::Config("import.sheet_name must not be empty".to_string()));
        }
        if let Err(e) = crate::plss::resolve_county(&self.plss.default_county) {
            return Err(NowiError::Config(format!("plss.default_county: {}", e)));
        }
        Ok(())
    }
}
