//! Integration tests for forkcheck-lib
//!
//! These drive complete runs, including:
//! - Suite lifecycle: setup once, every test, teardown once
//! - Failure containment: assertions, panics, signals, odd exit statuses
//! - Fixture snapshots and transcript separation between tests

pub mod isolation_test;
