//! Explicit state threaded through every entry point
//!
//! [`Ctx`] replaces the ambient globals a C harness would use: it names the
//! suite and test being run and owns the seeded generator. [`Fixture`] is
//! the suite's opaque shared object, filled by `setup_env`, borrowed by each
//! `test` and emptied by `teardown_env`.

use std::any::{type_name, Any};
use std::panic::Location;

use crate::rng::{Seed, TestRng};
use crate::trampoline::{message_failed, AssertionFailure, Outcome};

/// Per-invocation context
#[derive(Debug)]
pub struct Ctx {
    suite: String,
    test: Option<String>,
    rng: TestRng,
}

impl Ctx {
    pub fn new(suite: impl Into<String>, seed: Seed) -> Self {
        Self::with_rng(suite, TestRng::new(seed))
    }

    pub fn with_rng(suite: impl Into<String>, rng: TestRng) -> Self {
        Self {
            suite: suite.into(),
            test: None,
            rng,
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Name of the running test, `None` during setup and teardown
    pub fn test(&self) -> Option<&str> {
        self.test.as_deref()
    }

    pub(crate) fn enter_test(&mut self, test: &str) {
        self.test = Some(test.to_string());
    }

    pub(crate) fn leave_test(&mut self) {
        self.test = None;
    }

    pub(crate) fn enter_suite(&mut self, suite: &str) {
        self.suite = suite.to_string();
        self.test = None;
    }

    pub fn random_u32(&mut self) -> u32 {
        self.rng.random_u32()
    }

    pub fn random_u64(&mut self) -> u64 {
        self.rng.random_u64()
    }

    pub fn random_string(&mut self, width: usize) -> String {
        self.rng.random_string(width)
    }
}

/// Type-erased fixture slot owned by a suite run.
#[derive(Default)]
pub struct Fixture {
    slot: Option<Box<dyn Any>>,
}

impl Fixture {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Store `value`, replacing anything already installed, and hand back a
    /// reference to it so setup can keep populating.
    pub fn install<T: Any>(&mut self, value: T) -> &mut T {
        self.slot = Some(Box::new(value));
        match self.slot.as_mut().and_then(|b| b.downcast_mut::<T>()) {
            Some(value) => value,
            None => unreachable!("slot was just filled with this type"),
        }
    }

    #[track_caller]
    pub fn get<T: Any>(&self) -> Outcome<&T> {
        let caller = Location::caller();
        match self.slot.as_ref() {
            Some(boxed) => boxed.downcast_ref::<T>().ok_or_else(|| wrong_type::<T>(caller)),
            None => Err(not_installed::<T>(caller)),
        }
    }

    #[track_caller]
    pub fn get_mut<T: Any>(&mut self) -> Outcome<&mut T> {
        let caller = Location::caller();
        match self.slot.as_mut() {
            Some(boxed) => boxed.downcast_mut::<T>().ok_or_else(|| wrong_type::<T>(caller)),
            None => Err(not_installed::<T>(caller)),
        }
    }

    /// Move the fixture out, leaving the slot empty
    #[track_caller]
    pub fn take<T: Any>(&mut self) -> Outcome<T> {
        let caller = Location::caller();
        match self.slot.take() {
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(other) => {
                    self.slot = Some(other);
                    Err(wrong_type::<T>(caller))
                }
            },
            None => Err(not_installed::<T>(caller)),
        }
    }

    /// Drop whatever is installed
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

impl std::fmt::Debug for Fixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixture")
            .field("installed", &!self.is_empty())
            .finish()
    }
}

fn not_installed<T>(caller: &'static Location<'static>) -> AssertionFailure {
    message_failed(
        caller.file(),
        caller.line(),
        format_args!("fixture of type {} is not installed", type_name::<T>()),
    )
}

fn wrong_type<T>(caller: &'static Location<'static>) -> AssertionFailure {
    message_failed(
        caller.file(),
        caller.line(),
        format_args!("fixture is not of type {}", type_name::<T>()),
    )
}
