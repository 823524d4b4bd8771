//! Configuration file support.
//!
//! Settings come from a TOML file, either named with `--config` or found at
//! `<config_dir>/mappings-fetcher/config.toml`. Command-line flags take
//! precedence over the file, and the file over built-in defaults. A missing
//! default file is not an error; a missing explicit file is.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::artefact::download::HttpTimeouts;
use crate::dirs::{BaseDirs, fetcher_config_dir};
use crate::output::error_text;

/// File name of the configuration file inside the fetcher's config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file {} does not exist", path.display())]
    Missing {
        /// The requested file.
        path: PathBuf,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration file {}", path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid configuration file {}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidValue {
        /// The offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings loaded from `config.toml`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FetcherConfig {
    /// Game directory used when `--minecraft` is not given.
    pub game_dir: Option<PathBuf>,
    /// Output root used when `--output-dir` is not given.
    pub output_dir: Option<PathBuf>,
    /// Whole-request timeout in seconds, body transfer included.
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl FetcherConfig {
    const fn default_timeout_secs() -> u64 {
        300
    }

    const fn default_connect_timeout_secs() -> u64 {
        10
    }

    /// Parse configuration text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::InvalidValue`] for zero timeouts.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `explicit`, or from the default location.
    ///
    /// An unreadable default file is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// `explicit` names a file that does not exist.
    pub fn load(explicit: Option<&Path>, dirs: &dyn BaseDirs) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return match read_optional(path)? {
                Some(text) => Self::parse(&text, path),
                None => Err(ConfigError::Missing {
                    path: path.to_path_buf(),
                }),
            };
        }

        let Some(path) = default_config_path(dirs) else {
            debug!("no platform config directory; using defaults");
            return Ok(Self::default());
        };
        match read_optional(&path) {
            Ok(Some(text)) => Self::parse(&text, &path),
            Ok(None) => {
                debug!("no configuration at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => {
                warn!("{}; using defaults", error_text(&err));
                Ok(Self::default())
            }
        }
    }

    /// HTTP timeouts derived from this configuration.
    #[must_use]
    pub fn timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            global: Duration::from_secs(self.timeout_secs),
            connect: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    /// Replace the overall timeout, as `--timeout` does.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for zero.
    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        self.timeout_secs = secs;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let zero = |key| ConfigError::InvalidValue {
            key,
            reason: "must be greater than zero".to_owned(),
        };
        if self.timeout_secs == 0 {
            return Err(zero("timeout_secs"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(zero("connect_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            game_dir: None,
            output_dir: None,
            timeout_secs: Self::default_timeout_secs(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
        }
    }
}

/// `<config_dir>/mappings-fetcher/config.toml`, if a config dir is known.
#[must_use]
pub fn default_config_path(dirs: &dyn BaseDirs) -> Option<PathBuf> {
    fetcher_config_dir(dirs).map(|dir| dir.join(CONFIG_FILE_NAME))
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
