//! Configuration loading and document source resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The config file is the one named on the command line, else
//! `ACTORFINDER_CONFIG`, else `<config dir>/actorfinder/config.toml`.
//! A missing file is not an error: defaults apply. A file that exists but
//! does not parse is.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::loader::{DataLoader, DocumentSource};
use crate::{Error, Result};

/// Environment variable: actor document source
pub const ENV_ACTORS: &str = "ACTORFINDER_ACTORS";
/// Environment variable: association document source
pub const ENV_ASSOCIATIONS: &str = "ACTORFINDER_ASSOCIATIONS";
/// Environment variable: fetch timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "ACTORFINDER_TIMEOUT_SECS";
/// Environment variable: config file path
pub const ENV_CONFIG: &str = "ACTORFINDER_CONFIG";

/// Compiled defaults used when nothing else sets a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDefaults {
    pub actors_source: String,
    pub associations_source: String,
    pub fetch_timeout_secs: u64,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            actors_source: "data/actors.json".to_string(),
            associations_source: "data/scenesAndTags.json".to_string(),
            fetch_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

/// Settings read from the TOML config file
///
/// ```toml
/// actors_source = "https://example.com/data/actors.json"
/// associations_source = "https://example.com/data/scenesAndTags.json"
/// fetch_timeout_secs = 10
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Actor document location (URL or path)
    #[serde(default)]
    pub actors_source: Option<String>,

    /// Association document location (URL or path)
    #[serde(default)]
    pub associations_source: Option<String>,

    /// Per-document fetch timeout in seconds
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    CompiledDefaults::default().log_level
}

/// Values given on the command line; `None` means not given
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub actors_source: Option<String>,
    pub associations_source: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub actors: DocumentSource,
    pub associations: DocumentSource,
    pub fetch_timeout: Duration,
    pub log_level: String,
    /// Config file that was read, if any
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Resolve every setting from CLI, environment, config file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let config_path = cli
            .config_file
            .clone()
            .or_else(|| env_value(ENV_CONFIG).map(PathBuf::from));
        let explicit = config_path.is_some();
        let config_path = config_path.or_else(default_config_path);

        let (toml, config_file) = match config_path {
            Some(path) if path.exists() => (load_toml_config(&path)?, Some(path)),
            Some(path) => {
                if explicit {
                    warn!("Config file {} not found, using defaults", path.display());
                } else {
                    debug!("No config file at {}", path.display());
                }
                (TomlConfig::default(), None)
            }
            None => (TomlConfig::default(), None),
        };

        let actors = pick(
            cli.actors_source.clone(),
            ENV_ACTORS,
            toml.actors_source.clone(),
            defaults.actors_source,
        )
        .parse()?;

        let associations = pick(
            cli.associations_source.clone(),
            ENV_ASSOCIATIONS,
            toml.associations_source.clone(),
            defaults.associations_source,
        )
        .parse()?;

        let env_timeout = match env_value(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("Invalid {} '{}': {}", ENV_TIMEOUT_SECS, raw, e))
            })?),
            None => None,
        };
        let timeout_secs = cli
            .fetch_timeout_secs
            .or(env_timeout)
            .or(toml.fetch_timeout_secs)
            .unwrap_or(defaults.fetch_timeout_secs);
        if timeout_secs == 0 {
            return Err(Error::Config("fetch timeout must be at least 1 second".to_string()));
        }

        Ok(Self {
            actors,
            associations,
            fetch_timeout: Duration::from_secs(timeout_secs),
            log_level: toml.logging.level,
            config_file,
        })
    }

    /// Build a data loader for the resolved sources
    pub fn loader(&self) -> Result<DataLoader> {
        DataLoader::new(
            self.actors.clone(),
            self.associations.clone(),
            self.fetch_timeout,
        )
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Platform config file location: `<config dir>/actorfinder/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("actorfinder").join("config.toml"))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn pick(cli: Option<String>, env_name: &str, file: Option<String>, default: String) -> String {
    // Priority 1: Command-line argument
    if let Some(value) = cli {
        return value;
    }

    // Priority 2: Environment variable
    if let Some(value) = env_value(env_name) {
        return value;
    }

    // Priority 3: TOML config file
    if let Some(value) = file {
        return value;
    }

    // Priority 4: Compiled default
    default
}
