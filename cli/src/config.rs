use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use rangegen::partition::DEFAULT_CEILING_DIGITS;
use rangegen::{CoverMode, Partitioner, RangeError};

/// Cover mode as spelled in config files and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Output identical to the established generator
    #[default]
    Reference,
    /// Gap-free cover, every number matched exactly once
    Exact,
}

impl From<Mode> for CoverMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Reference => CoverMode::Reference,
            Mode::Exact => CoverMode::Exact,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Longest supported number, in digits.
    #[serde(default = "default_ceiling")]
    pub ceiling_digits: u32,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub output: OutputConfig,
}

/// How each pattern is written as a dialplan line.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_keyword")]
    pub keyword: String,

    /// Priority written before the application. Defaults to 1.
    #[serde(default)]
    pub priority: Option<u32>,

    /// Application (with arguments) to run, e.g. `Return(ok)`. Without one,
    /// lines carry the pattern only.
    #[serde(default)]
    pub application: Option<String>,
}

pub fn default_ceiling() -> u32 {
    DEFAULT_CEILING_DIGITS
}

fn default_keyword() -> String {
    "exten".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ceiling_digits: default_ceiling(),
            mode: Mode::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            keyword: default_keyword(),
            priority: None,
            application: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Config::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn partitioner(&self) -> Result<Partitioner, RangeError> {
        Partitioner::new(self.ceiling_digits, self.mode.into())
    }
}

impl OutputConfig {
    /// `exten => _23[4-9]` or, with an application, `exten => _23[4-9],1,Return(ok)`.
    pub fn format_line(&self, pattern: &str) -> String {
        match &self.application {
            Some(application) => format!(
                "{} => {},{},{}",
                self.keyword,
                pattern,
                self.priority.unwrap_or(1),
                application
            ),
            None => format!("{} => {}", self.keyword, pattern),
        }
    }
}
