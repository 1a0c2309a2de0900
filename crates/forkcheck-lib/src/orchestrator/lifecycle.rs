//! Per-suite phase tracking
//!
//! ```text
//! Pending -> SetupRunning -> SetupOk -> TestsRunning -> TeardownRunning -> Done
//!                         \-> SetupFailed ------------/
//! ```

use log::debug;

use crate::error::{HarnessError, HarnessResult};
use crate::trampoline::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuitePhase {
    Pending,
    SetupRunning,
    SetupOk,
    SetupFailed,
    TestsRunning,
    TeardownRunning,
    Done,
}

impl SuitePhase {
    pub fn can_advance_to(self, next: SuitePhase) -> bool {
        use SuitePhase::*;
        matches!(
            (self, next),
            (Pending, SetupRunning)
                | (SetupRunning, SetupOk)
                | (SetupRunning, SetupFailed)
                | (SetupOk, TestsRunning)
                | (TestsRunning, TeardownRunning)
                | (SetupFailed, TeardownRunning)
                | (TeardownRunning, Done)
        )
    }

    pub fn advance(self, next: SuitePhase) -> Outcome<SuitePhase> {
        crate::check_quiet!(self.can_advance_to(next));
        Ok(next)
    }
}

/// Phase of one named suite
#[derive(Debug, Clone)]
pub struct SuiteLifecycle {
    suite: String,
    phase: SuitePhase,
}

impl SuiteLifecycle {
    pub fn new(suite: &str) -> Self {
        Self {
            suite: suite.to_string(),
            phase: SuitePhase::Pending,
        }
    }

    pub fn phase(&self) -> SuitePhase {
        self.phase
    }

    /// Move to `next`; an illegal transition is a harness bug.
    pub fn advance(&mut self, next: SuitePhase) -> HarnessResult<()> {
        let from = self.phase;
        self.phase = from.advance(next).map_err(|_| {
            HarnessError::Internal(format!(
                "suite {}: illegal transition {:?} -> {:?}",
                self.suite, from, next
            ))
        })?;
        debug!("suite {}: {:?} -> {:?}", self.suite, from, next);
        Ok(())
    }
}
