//! Test suite for forkcheck-lib
//!
//! - `common`: a temporary test-root builder and a recording reporter
//! - `integration`: whole runs through the orchestrator, forked and inline
//!
//! Every test that runs suites redirects the process's stdout/stderr and
//! forks, so they are all `#[serial]`.

pub mod common;
pub mod integration;
