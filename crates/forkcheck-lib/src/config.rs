//! Optional per-root configuration
//!
//! A `forkcheck.toml` next to the suite directories can change the module
//! suffix, the color mode and the isolation strategy. Command-line flags
//! override what the file says.

use log::debug;
use serde::Deserialize;
use std::io::{self, IsTerminal};
use std::path::Path;

use crate::error::{HarnessError, HarnessResult};
use crate::module::DEFAULT_SUFFIX;

/// File looked up in the test root
pub const CONFIG_FILE_NAME: &str = "forkcheck.toml";

/// When to emit ANSI styling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// How each test is separated from the harness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Isolation {
    /// One forked child per test
    #[default]
    Fork,
    /// Same process, for debugging
    Inline,
}

/// Settings read from `forkcheck.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub suffix: String,
    pub color: ColorChoice,
    pub isolation: Isolation,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            color: ColorChoice::default(),
            isolation: Isolation::default(),
        }
    }
}

impl HarnessConfig {
    /// Load `root/forkcheck.toml`, falling back to defaults when it does
    /// not exist.
    pub fn load(root: &Path) -> HarnessResult<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No {} under {:?}, using defaults", CONFIG_FILE_NAME, root);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(HarnessError::Config {
                    path,
                    reason: e.to_string(),
                })
            }
        };

        let config = Self::parse(&content).map_err(|reason| HarnessError::Config {
            path: path.clone(),
            reason,
        })?;
        debug!("Loaded {:?}: {:?}", path, config);
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, String> {
        let config: HarnessConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        if config.suffix.is_empty() {
            return Err("suffix must not be empty".to_string());
        }
        Ok(config)
    }
}
