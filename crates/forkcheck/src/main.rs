use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use env_logger::Env;
use forkcheck_lib::cli::{self, Cli};
use forkcheck_lib::HarnessError;
use log::info;
use std::process::ExitCode;

mod demo;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version are printed to stdout and are not failures
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize logger with specified or default log level
    let env = match cli.log_level {
        Some(ref log_level) => Env::default().filter_or("RUST_LOG", log_level),
        None => Env::default().filter_or("RUST_LOG", "warn"),
    };
    env_logger::init_from_env(env);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(HarnessError::Argument(message)) = err.downcast_ref::<HarnessError>() {
                eprintln!("{}", message);
                eprintln!("{}", Cli::command().render_usage());
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let registry = demo::registry();
    let report = cli::run(cli, &registry).context("Test run did not complete")?;

    let failed = report
        .suites
        .iter()
        .flat_map(|suite| &suite.tests)
        .filter(|test| !test.outcome.is_pass())
        .count();
    info!(
        "Finished {} suite(s) with seed {}, {} test(s) not passing",
        report.suites.len(),
        report.seed.value(),
        failed
    );
    Ok(())
}
