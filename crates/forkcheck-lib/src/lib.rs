pub mod capture;
pub mod cli;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod hash;
pub mod module;
pub mod orchestrator;
pub mod report;
pub mod rng;
pub mod trampoline;

#[cfg(test)]
mod test_support;

pub use capture::{OutputCapture, Transcript};
pub use context::{Ctx, Fixture};
pub use discovery::{plan_run, Selection, SuitePlan};
pub use error::{HarnessError, HarnessResult};
pub use executor::{Crash, Executor, ForkExecutor, InlineExecutor, Invocation, Status};
pub use hash::{djb2, hash_file, FileStamp};
pub use module::{Capability, EntryPoint, Module, ModuleLoader, Registry};
pub use orchestrator::{Orchestrator, RunSettings};
pub use report::{ConsoleReporter, Reporter, RunReport, SuiteReport, TestOutcome, TestReport};
pub use rng::{Seed, TestRng};
pub use trampoline::{AssertionFailure, Outcome};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
