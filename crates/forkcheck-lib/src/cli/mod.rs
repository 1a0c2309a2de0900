//! Command-line entry into a run
//!
//! [`commands::Cli`] is the argument surface; [`run`] resolves it together
//! with `forkcheck.toml` into [`RunOptions`], plans the run and drives the
//! orchestrator with the console reporter.

pub mod commands;

pub use commands::Cli;

use log::debug;
use std::path::{Path, PathBuf};

use crate::config::{HarnessConfig, Isolation};
use crate::discovery::{plan_run, Selection};
use crate::error::{HarnessError, HarnessResult};
use crate::executor::{Executor, ForkExecutor, InlineExecutor};
use crate::module::ModuleLoader;
use crate::orchestrator::{Orchestrator, RunSettings};
use crate::report::{ConsoleReporter, Reporter, RunReport};
use crate::rng::Seed;

/// A run's inputs after CLI flags have been layered over the config file
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub selection: Selection,
    pub seed: Seed,
    pub suffix: String,
    pub color: bool,
    pub isolation: Isolation,
}

impl RunOptions {
    pub fn resolve(cli: &Cli) -> HarnessResult<Self> {
        let seed = Seed::resolve(cli.seed_value()?);
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => default_root()?,
        };
        let config = HarnessConfig::load(&root)?;

        let isolation = if cli.inline {
            Isolation::Inline
        } else {
            config.isolation
        };
        let color = cli.color.unwrap_or(config.color).enabled();

        let options = Self {
            root,
            selection: cli.selection(),
            seed,
            suffix: config.suffix,
            color,
            isolation,
        };
        debug!("Resolved run options: {:?}", options);
        Ok(options)
    }
}

/// Directory containing the running executable
pub fn default_root() -> HarnessResult<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        HarnessError::Argument(format!("cannot derive a test root from {:?}", exe))
    })
}

/// Run what `cli` selects, reporting to stdout.
pub fn run(cli: &Cli, loader: &dyn ModuleLoader) -> HarnessResult<RunReport> {
    let options = RunOptions::resolve(cli)?;
    let reporter = ConsoleReporter::stdout(options.color);
    run_with(&options, loader, reporter)
}

/// Run with already resolved options and any reporter.
pub fn run_with<R: Reporter>(
    options: &RunOptions,
    loader: &dyn ModuleLoader,
    reporter: R,
) -> HarnessResult<RunReport> {
    let plan = plan_run(&options.root, &options.selection, &options.suffix)?;

    let executor: Box<dyn Executor> = match options.isolation {
        Isolation::Fork => Box::new(ForkExecutor::new()),
        Isolation::Inline => Box::new(InlineExecutor::new()),
    };
    let settings = RunSettings {
        root: options.root.clone(),
        suffix: options.suffix.clone(),
        seed: options.seed,
    };

    Orchestrator::new(settings, loader, executor, reporter).run(&plan)
}
