//! Runtime configuration.
//!
//! Settings come from an optional TOML file. Every key is optional and falls
//! back to the built-in default when absent.

use anyhow::{Context, Result, bail};
use logstat_core::access_log::DEFAULT_LOG_PREFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for access logs
    pub log_dir: PathBuf,
    /// Directory reports are written to
    pub report_dir: PathBuf,
    /// Maximum number of URL rows in a report
    pub report_size: usize,
    /// Write application logs to this file instead of stdout
    pub log_file: Option<PathBuf>,
    /// Largest tolerated share of unparsable lines (0.0 - 1.0)
    pub parsing_error_threshold: f64,
    /// HTML template with a `$table_json` placeholder; built-in when unset
    pub template_file: Option<PathBuf>,
    /// File name prefix of the access logs
    pub log_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./log"),
            report_dir: PathBuf::from("./reports"),
            report_size: 1000,
            log_file: None,
            parsing_error_threshold: 0.1,
            template_file: None,
            log_prefix: DEFAULT_LOG_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Defaults, overridden by the given file when present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml(&content)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.parsing_error_threshold) {
            bail!(
                "parsing_error_threshold must be between 0 and 1, got {}",
                self.parsing_error_threshold
            );
        }
        if self.log_prefix.is_empty() {
            bail!("log_prefix must not be empty");
        }
        Ok(())
    }
}
