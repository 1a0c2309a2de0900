use clap::Parser;
use std::path::PathBuf;

use crate::config::ColorChoice;
use crate::discovery::Selection;
use crate::error::{HarnessError, HarnessResult};

/// forkcheck - run native unit test suites, one forked process per test
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Run every suite found under the test root
    #[arg(short = 'a', long = "all", conflicts_with = "suites")]
    pub all: bool,

    /// Seed for the random generators (default: derived from the clock)
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<String>,

    /// Directory holding the suites (default: the runner's own directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Run tests in the runner process instead of forking
    #[arg(long)]
    pub inline: bool,

    /// Colorize the report
    #[arg(long, value_enum, value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    /// Optional log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Suites to run, in this order
    #[arg(value_name = "SUITE")]
    pub suites: Vec<String>,
}

impl Cli {
    pub fn selection(&self) -> Selection {
        if self.all {
            Selection::All
        } else {
            Selection::Named(self.suites.clone())
        }
    }

    /// The explicit seed, if one was given and is a valid integer
    pub fn seed_value(&self) -> HarnessResult<Option<u64>> {
        self.seed
            .as_deref()
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|_| HarnessError::Argument(format!("Invalid seed: {}", raw)))
            })
            .transpose()
    }
}
