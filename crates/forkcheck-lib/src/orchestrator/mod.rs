//! Suite lifecycle driver
//!
//! For each planned suite: run `setup_env` once in this process so the
//! fixture it builds is inherited by every test child, run each test
//! through the [`Executor`], then run `teardown_env` once. A failed setup
//! skips the suite's tests but still runs teardown.
//!
//! Tests never see each other's fixture mutations when run through a
//! [`ForkExecutor`](crate::executor::ForkExecutor): each child works on its
//! own copy of the parent's memory, and nothing it changes travels back.

mod lifecycle;

pub use lifecycle::{SuiteLifecycle, SuitePhase};

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::capture::{OutputCapture, Transcript};
use crate::context::{Ctx, Fixture};
use crate::discovery::SuitePlan;
use crate::error::HarnessResult;
use crate::executor::{run_guarded, Executor, Status, TestJob};
use crate::module::{module_path, Capability, ModuleLoader, SETUP_MODULE};
use crate::report::{Reporter, RunReport, SuiteReport, TestOutcome, TestReport};
use crate::rng::Seed;
use crate::trampoline;

/// Fixed inputs of one run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub root: PathBuf,
    pub suffix: String,
    pub seed: Seed,
}

pub struct Orchestrator<'a, R: Reporter> {
    settings: RunSettings,
    loader: &'a dyn ModuleLoader,
    executor: Box<dyn Executor>,
    reporter: R,
}

impl<'a, R: Reporter> Orchestrator<'a, R> {
    pub fn new(
        settings: RunSettings,
        loader: &'a dyn ModuleLoader,
        executor: Box<dyn Executor>,
        reporter: R,
    ) -> Self {
        Self {
            settings,
            loader,
            executor,
            reporter,
        }
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Run every suite of `plan` in order.
    ///
    /// Test failures and crashes end up in the report; an `Err` means the
    /// harness itself could not continue.
    pub fn run(&mut self, plan: &[SuitePlan]) -> HarnessResult<RunReport> {
        let seed = self.settings.seed;
        info!(
            "Running {} suite(s) from {:?} with {} isolation",
            plan.len(),
            self.settings.root,
            self.executor.name()
        );

        let mut capture = OutputCapture::new()?;
        let mut ctx = Ctx::new("", seed);
        self.reporter.run_started(seed)?;

        let mut suites = Vec::with_capacity(plan.len());
        for suite in plan {
            suites.push(self.run_suite(suite, &mut ctx, &mut capture)?);
        }

        Ok(RunReport { seed, suites })
    }

    fn run_suite(
        &mut self,
        plan: &SuitePlan,
        ctx: &mut Ctx,
        capture: &mut OutputCapture,
    ) -> HarnessResult<SuiteReport> {
        let mut lifecycle = SuiteLifecycle::new(&plan.name);
        let mut fixture = Fixture::empty();
        let setup_path = self.module_path(&plan.name, SETUP_MODULE);
        ctx.enter_suite(&plan.name);

        self.reporter.suite_started(&plan.name)?;

        lifecycle.advance(SuitePhase::SetupRunning)?;
        self.reporter.setup_started(&plan.name)?;
        let (setup, transcript) = self.run_fixture_entry(
            &plan.name,
            &setup_path,
            Capability::SetupEnv,
            ctx,
            &mut fixture,
            capture,
        )?;
        self.reporter.setup_finished(&setup, &transcript)?;

        let mut tests = Vec::with_capacity(plan.tests.len());
        if setup.is_pass() {
            lifecycle.advance(SuitePhase::SetupOk)?;
            lifecycle.advance(SuitePhase::TestsRunning)?;

            for test in &plan.tests {
                let path = self.module_path(&plan.name, test);
                self.reporter.test_started(test)?;
                let job = TestJob {
                    suite: &plan.name,
                    test,
                    path: &path,
                    loader: self.loader,
                    ctx: &mut *ctx,
                    fixture: &mut fixture,
                };
                let invocation = self.executor.execute(job, capture)?;
                self.reporter
                    .test_finished(test, &invocation.status, &invocation.transcript)?;

                tests.push(TestReport {
                    name: test.clone(),
                    outcome: TestOutcome::Ran(invocation.status),
                    transcript: invocation.transcript,
                });
            }
        } else {
            lifecycle.advance(SuitePhase::SetupFailed)?;
            info!(
                "Setup of suite {} failed, skipping {} test(s)",
                plan.name,
                plan.tests.len()
            );

            for test in &plan.tests {
                self.reporter.test_skipped(test)?;
                tests.push(TestReport {
                    name: test.clone(),
                    outcome: TestOutcome::Skipped,
                    transcript: Transcript::default(),
                });
            }
        }

        lifecycle.advance(SuitePhase::TeardownRunning)?;
        self.reporter.teardown_started(&plan.name)?;
        let (teardown, transcript) = self.run_fixture_entry(
            &plan.name,
            &setup_path,
            Capability::TeardownEnv,
            ctx,
            &mut fixture,
            capture,
        )?;
        self.reporter.teardown_finished(&teardown, &transcript)?;
        lifecycle.advance(SuitePhase::Done)?;

        if !fixture.is_empty() {
            debug!("Suite {}: teardown left the fixture installed, dropping it", plan.name);
            fixture.clear();
        }

        let report = SuiteReport {
            name: plan.name.clone(),
            setup,
            tests,
            teardown,
        };
        self.reporter.suite_finished(&report)?;
        Ok(report)
    }

    /// Run `setup_env` or `teardown_env` of the suite's setup module in
    /// this process, under capture and a trampoline scope.
    fn run_fixture_entry(
        &self,
        suite: &str,
        path: &Path,
        capability: Capability,
        ctx: &mut Ctx,
        fixture: &mut Fixture,
        capture: &mut OutputCapture,
    ) -> HarnessResult<(Status, Transcript)> {
        let loader = self.loader;
        capture.capture(|| {
            match loader
                .load(suite, SETUP_MODULE, path)
                .and_then(|module| module.resolve(capability))
            {
                Ok(entry) => run_guarded(entry, ctx, fixture),
                Err(err) => {
                    trampoline::diagnostic(format_args!("{}", err));
                    Status::AssertionFailed
                }
            }
        })
    }

    fn module_path(&self, suite: &str, basename: &str) -> PathBuf {
        module_path(&self.settings.root, suite, basename, &self.settings.suffix)
    }
}
