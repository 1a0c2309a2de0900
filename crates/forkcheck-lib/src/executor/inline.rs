use log::debug;

use super::{invoke_test, Executor, Invocation, TestJob};
use crate::capture::OutputCapture;
use crate::error::HarnessResult;

/// Runs tests in the calling process.
///
/// Panics and failed checks are still contained, but a signal takes the
/// whole run down and fixture mutations are visible to later tests.
#[derive(Debug, Default)]
pub struct InlineExecutor;

impl InlineExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for InlineExecutor {
    fn execute(&mut self, mut job: TestJob<'_>, capture: &mut OutputCapture) -> HarnessResult<Invocation> {
        let guard = capture.begin()?;
        let status = invoke_test(&mut job);
        let transcript = guard.finish()?;

        debug!("{}/{}: finished inline with {:?}", job.suite, job.test, status);

        Ok(Invocation {
            pid: None,
            status,
            transcript,
        })
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}
