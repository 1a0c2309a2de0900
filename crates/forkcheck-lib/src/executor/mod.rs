//! Running one test's `test` entry point
//!
//! An [`Executor`] takes a [`TestJob`], brackets it with output capture and
//! a trampoline scope, and hands back an [`Invocation`]: the status of the
//! run and everything it printed. [`ForkExecutor`] is the isolating
//! implementation; [`InlineExecutor`] runs in the calling process and exists
//! for debugging.

mod fork;
mod inline;

pub use fork::ForkExecutor;
pub use inline::InlineExecutor;

use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::capture::{OutputCapture, Transcript};
use crate::context::{Ctx, Fixture};
use crate::error::HarnessResult;
use crate::module::{Capability, EntryPoint, ModuleLoader};
use crate::trampoline;

/// Exit status of an isolated test whose trampoline fired
pub const ASSERTION_EXIT_STATUS: i32 = 1;

/// Exit status of an isolated test that panicked
pub const PANIC_EXIT_STATUS: i32 = 101;

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Passed,
    AssertionFailed,
    Crashed(Crash),
}

/// Abnormal termination of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    /// Killed by a signal
    Signal(Signal),
    /// Exited with a status the harness does not assign
    Exit(i32),
    /// Unwound out of the entry point
    Panicked,
}

impl Status {
    pub fn is_pass(&self) -> bool {
        matches!(self, Status::Passed)
    }

    /// Extra detail for the report, present for crashes only
    pub fn detail(&self) -> Option<String> {
        match self {
            Status::Crashed(crash) => Some(crash.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Crash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crash::Signal(signal) => write!(f, "killed by {}", signal.as_str()),
            Crash::Exit(code) => write!(f, "exited with status {}", code),
            Crash::Panicked => write!(f, "panicked, exit status {}", PANIC_EXIT_STATUS),
        }
    }
}

/// Everything needed to run one test
pub struct TestJob<'a> {
    pub suite: &'a str,
    pub test: &'a str,
    pub path: &'a Path,
    pub loader: &'a dyn ModuleLoader,
    pub ctx: &'a mut Ctx,
    pub fixture: &'a mut Fixture,
}

/// Record of one test's execution
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Process that ran the test, `None` when it ran inline
    pub pid: Option<Pid>,
    pub status: Status,
    pub transcript: Transcript,
}

/// Runs a test under capture and a trampoline scope.
pub trait Executor {
    fn execute(&mut self, job: TestJob<'_>, capture: &mut OutputCapture) -> HarnessResult<Invocation>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Invoke `entry` as one trampoline scope.
///
/// A returned [`AssertionFailure`](crate::AssertionFailure) and a panic are
/// both stopped here.
pub fn run_guarded(entry: EntryPoint, ctx: &mut Ctx, fixture: &mut Fixture) -> Status {
    match panic::catch_unwind(AssertUnwindSafe(|| entry(ctx, fixture))) {
        Ok(Ok(())) => Status::Passed,
        Ok(Err(_)) => Status::AssertionFailed,
        Err(_) => Status::Crashed(Crash::Panicked),
    }
}

/// Load the job's module, resolve `test` and run it.
///
/// A module that cannot be loaded or lacks `test` is reported into the
/// current output like a failed assertion.
pub(crate) fn invoke_test(job: &mut TestJob<'_>) -> Status {
    let entry = match job
        .loader
        .load(job.suite, job.test, job.path)
        .and_then(|module| module.resolve(Capability::Test))
    {
        Ok(entry) => entry,
        Err(err) => {
            trampoline::diagnostic(format_args!("{}", err));
            return Status::AssertionFailed;
        }
    };

    job.ctx.enter_test(job.test);
    let status = run_guarded(entry, job.ctx, job.fixture);
    job.ctx.leave_test();
    status
}
