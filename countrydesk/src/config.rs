//! Session configuration.
//!
//! Defaults reproduce the plain behaviour: a fixed file in the working
//! directory and a prompt before writing the seed dataset. The CLI maps its
//! flags and environment variables onto [`Config`].
use std::{fmt::Display, path::PathBuf, str::FromStr};

/// File used for loading and saving when no path is configured.
pub const DEFAULT_DATA_FILE: &str = "countries.csv";

/// Default `tracing` directive installed by the CLI.
pub const DEFAULT_LOG_DIRECTIVE: &str = "countrydesk=info";

/// What to do when the data file doesn't exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Ask the user before writing the seed dataset.
    #[default]
    Ask,
    Always,
    /// Start with an empty store.
    Never,
}

impl FromStr for SeedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ask" => Ok(SeedPolicy::Ask),
            "always" => Ok(SeedPolicy::Always),
            "never" => Ok(SeedPolicy::Never),
            other => Err(format!("Invalid seed policy => {} (ask, always, never)", other)),
        }
    }
}

impl Display for SeedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ask => write!(f, "ask"),
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub seed: SeedPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            seed: SeedPolicy::default(),
        }
    }
}

impl Config {
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Config {
        self.data_path = path.into();
        self
    }

    pub fn with_seed(mut self, seed: SeedPolicy) -> Config {
        self.seed = seed;
        self
    }
}
