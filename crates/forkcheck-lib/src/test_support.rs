//! Helpers for unit tests that touch the process's standard streams

use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult};
use std::panic::{self, AssertUnwindSafe};

use crate::capture::{OutputCapture, Transcript};

/// Run `check` in a forked child and report whether it returned true.
///
/// Redirection and diagnostics stay in the child, so they can neither race
/// with nor leak into the test harness's own output.
pub(crate) fn in_child(check: impl FnOnce() -> bool) -> bool {
    match unsafe { fork() }.unwrap() {
        ForkResult::Child => {
            let ok = panic::catch_unwind(AssertUnwindSafe(check)).unwrap_or(false);
            unsafe { libc::_exit(if ok { 0 } else { 1 }) }
        }
        ForkResult::Parent { child } => {
            matches!(waitpid(child, None).unwrap(), WaitStatus::Exited(_, 0))
        }
    }
}

/// Run `f` under capture in a forked child and let `verify` judge its
/// result together with everything it printed.
pub(crate) fn captured_in_child<T>(
    f: impl FnOnce() -> T,
    verify: impl FnOnce(T, &Transcript) -> bool,
) -> bool {
    in_child(|| {
        let Ok(mut capture) = OutputCapture::new() else {
            return false;
        };
        match capture.capture(f) {
            Ok((value, transcript)) => verify(value, &transcript),
            Err(_) => false,
        }
    })
}
