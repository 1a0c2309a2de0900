use log::debug;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};
use std::io::{self, Write};

use super::{
    invoke_test, Crash, Executor, Invocation, Status, TestJob, ASSERTION_EXIT_STATUS,
    PANIC_EXIT_STATUS,
};
use crate::capture::OutputCapture;
use crate::error::{HarnessError, HarnessResult};

/// Runs every test in a freshly forked child.
///
/// The child sees a copy-on-write snapshot of the fixture, so nothing a
/// test mutates survives into the next one, and a crash kills only the
/// child. The child leaves through `_exit` with a status the parent maps
/// back to a [`Status`].
#[derive(Debug, Default)]
pub struct ForkExecutor;

impl ForkExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for ForkExecutor {
    fn execute(&mut self, mut job: TestJob<'_>, capture: &mut OutputCapture) -> HarnessResult<Invocation> {
        let guard = capture.begin()?;

        // SAFETY: the child only runs the test body and then leaves through
        // `_exit` without returning into the caller's stack.
        let child = match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                let status = invoke_test(&mut job);
                let _ = io::stdout().flush();
                let _ = io::stderr().flush();
                unsafe { libc::_exit(exit_status(status)) }
            }
            Ok(ForkResult::Parent { child }) => child,
            Err(e) => return Err(HarnessError::Fork(e)),
        };

        let waited = wait_for(child);
        let transcript = guard.finish()?;
        let status = waited?;

        debug!(
            "{}/{}: child {} finished with {:?}",
            job.suite, job.test, child, status
        );

        Ok(Invocation {
            pid: Some(child),
            status,
            transcript,
        })
    }

    fn name(&self) -> &'static str {
        "fork"
    }
}

/// Status a child reports for a finished test
fn exit_status(status: Status) -> i32 {
    match status {
        Status::Passed => 0,
        Status::AssertionFailed => ASSERTION_EXIT_STATUS,
        Status::Crashed(Crash::Exit(code)) => code,
        Status::Crashed(_) => PANIC_EXIT_STATUS,
    }
}

/// Block until `child` terminates and classify how it ended.
fn wait_for(child: Pid) -> HarnessResult<Status> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, 0)) => return Ok(Status::Passed),
            Ok(WaitStatus::Exited(_, ASSERTION_EXIT_STATUS)) => return Ok(Status::AssertionFailed),
            Ok(WaitStatus::Exited(_, PANIC_EXIT_STATUS)) => {
                return Ok(Status::Crashed(Crash::Panicked))
            }
            Ok(WaitStatus::Exited(_, code)) => return Ok(Status::Crashed(Crash::Exit(code))),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                return Ok(Status::Crashed(Crash::Signal(signal)))
            }
            // Stopped or continued: the child is still alive
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(HarnessError::Wait(e)),
        }
    }
}
