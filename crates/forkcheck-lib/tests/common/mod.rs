//! Common test utilities for forkcheck-lib
//!
//! [`TestRoot`] lays out suite directories and module files in a temporary
//! directory; [`RecordingReporter`] keeps every reporter event so a test
//! can check ordering without parsing console output.

use forkcheck_lib::config::Isolation;
use forkcheck_lib::{
    plan_run, Executor, ForkExecutor, InlineExecutor, Orchestrator, Registry, Reporter,
    RunReport, RunSettings, Seed, Selection, Status, SuiteReport, Transcript,
};
use std::fs;
use std::io;
use std::path::Path;
use tempfile::{tempdir, TempDir};

pub const SUFFIX: &str = ".tst";

/// A test root on disk
pub struct TestRoot {
    dir: TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        Self {
            dir: tempdir().expect("failed to create test root"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create `suite/` with a `setup` module and one module file per test
    pub fn suite(self, name: &str, tests: &[&str]) -> Self {
        let with_setup = self.bare_suite(name, tests);
        with_setup.module(name, "setup")
    }

    /// Create `suite/` with test module files only
    pub fn bare_suite(self, name: &str, tests: &[&str]) -> Self {
        fs::create_dir_all(self.path().join(name)).expect("failed to create suite dir");
        tests.iter().fold(self, |root, test| root.module(name, test))
    }

    pub fn module(self, suite: &str, basename: &str) -> Self {
        let path = self.path().join(suite).join(format!("{}{}", basename, SUFFIX));
        fs::write(path, b"").expect("failed to create module file");
        self
    }

    /// Run `selection` against `registry` and hand back the report and the
    /// reporter's event log.
    pub fn run(
        &self,
        registry: &Registry,
        selection: Selection,
        isolation: Isolation,
        seed: u64,
    ) -> (RunReport, RecordingReporter) {
        let plan = plan_run(self.path(), &selection, SUFFIX).expect("planning failed");
        let executor: Box<dyn Executor> = match isolation {
            Isolation::Fork => Box::new(ForkExecutor::new()),
            Isolation::Inline => Box::new(InlineExecutor::new()),
        };
        let settings = RunSettings {
            root: self.path().to_path_buf(),
            suffix: SUFFIX.to_string(),
            seed: Seed::explicit(seed),
        };

        let mut orchestrator =
            Orchestrator::new(settings, registry, executor, RecordingReporter::default());
        let report = orchestrator.run(&plan).expect("run failed");
        (report, orchestrator.into_reporter())
    }

    /// Fork-isolated run of one suite
    pub fn run_suite(&self, registry: &Registry, suite: &str) -> SuiteReport {
        let (report, _) = self.run(
            registry,
            Selection::Named(vec![suite.to_string()]),
            Isolation::Fork,
            1,
        );
        report.suites.into_iter().next().expect("suite missing from report")
    }
}

/// One reporter callback, with the transcript when there is one
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RunStarted(u64),
    SuiteStarted(String),
    SetupStarted,
    SetupFinished(Status, Transcript),
    TestStarted(String),
    TestFinished(String, Status, Transcript),
    TestSkipped(String),
    TeardownStarted,
    TeardownFinished(Status, Transcript),
    SuiteFinished(String),
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    /// Event names only, for order checks
    pub fn outline(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|event| match event {
                Event::RunStarted(seed) => format!("run {}", seed),
                Event::SuiteStarted(name) => format!("suite {}", name),
                Event::SetupStarted => "setup".to_string(),
                Event::SetupFinished(status, _) => format!("setup {:?}", status),
                Event::TestStarted(name) => format!("start {}", name),
                Event::TestFinished(name, status, _) => format!("finish {} {:?}", name, status),
                Event::TestSkipped(name) => format!("skip {}", name),
                Event::TeardownStarted => "teardown".to_string(),
                Event::TeardownFinished(status, _) => format!("teardown {:?}", status),
                Event::SuiteFinished(name) => format!("done {}", name),
            })
            .collect()
    }

    pub fn setup_transcript(&self) -> Option<&Transcript> {
        self.events.iter().find_map(|event| match event {
            Event::SetupFinished(_, transcript) => Some(transcript),
            _ => None,
        })
    }

    pub fn teardown_transcript(&self) -> Option<&Transcript> {
        self.events.iter().find_map(|event| match event {
            Event::TeardownFinished(_, transcript) => Some(transcript),
            _ => None,
        })
    }
}

impl Reporter for RecordingReporter {
    fn run_started(&mut self, seed: Seed) -> io::Result<()> {
        self.events.push(Event::RunStarted(seed.value()));
        Ok(())
    }

    fn suite_started(&mut self, suite: &str) -> io::Result<()> {
        self.events.push(Event::SuiteStarted(suite.to_string()));
        Ok(())
    }

    fn setup_started(&mut self, _suite: &str) -> io::Result<()> {
        self.events.push(Event::SetupStarted);
        Ok(())
    }

    fn setup_finished(&mut self, status: &Status, transcript: &Transcript) -> io::Result<()> {
        self.events.push(Event::SetupFinished(*status, transcript.clone()));
        Ok(())
    }

    fn test_started(&mut self, test: &str) -> io::Result<()> {
        self.events.push(Event::TestStarted(test.to_string()));
        Ok(())
    }

    fn test_finished(&mut self, test: &str, status: &Status, transcript: &Transcript) -> io::Result<()> {
        self.events
            .push(Event::TestFinished(test.to_string(), *status, transcript.clone()));
        Ok(())
    }

    fn test_skipped(&mut self, test: &str) -> io::Result<()> {
        self.events.push(Event::TestSkipped(test.to_string()));
        Ok(())
    }

    fn teardown_started(&mut self, _suite: &str) -> io::Result<()> {
        self.events.push(Event::TeardownStarted);
        Ok(())
    }

    fn teardown_finished(&mut self, status: &Status, transcript: &Transcript) -> io::Result<()> {
        self.events.push(Event::TeardownFinished(*status, transcript.clone()));
        Ok(())
    }

    fn suite_finished(&mut self, report: &SuiteReport) -> io::Result<()> {
        self.events.push(Event::SuiteFinished(report.name.clone()));
        Ok(())
    }
}
