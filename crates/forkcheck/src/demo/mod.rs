//! Built-in suites the runner ships with
//!
//! They exercise the harness itself: passing and failing checks, crashes,
//! fixture snapshots and seeded data. Their module files live under
//! `crates/forkcheck/suites/`.

mod basics;
mod broken;
mod fixture;
mod random;

use forkcheck_lib::Registry;

pub fn registry() -> Registry {
    let mut registry = Registry::new();
    basics::register(&mut registry);
    broken::register(&mut registry);
    fixture::register(&mut registry);
    random::register(&mut registry);
    registry
}
