//! Seeded pseudo-random data for tests
//!
//! One generator is seeded before any suite runs. Forked test processes
//! inherit a copy of its state, so a run with the same seed feeds every
//! test the same data.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Lowest character produced by [`TestRng::random_string`] (`'!'`)
pub const PRINTABLE_MIN: u8 = 33;
/// Highest character produced by [`TestRng::random_string`] (`'~'`)
pub const PRINTABLE_MAX: u8 = 126;

/// Where a run's seed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// Given on the command line
    Explicit,
    /// Derived from the wall clock
    Clock,
}

/// A run seed together with its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    value: u64,
    source: SeedSource,
}

impl Seed {
    pub fn explicit(value: u64) -> Self {
        Self {
            value,
            source: SeedSource::Explicit,
        }
    }

    /// Derive a seed from the current time
    pub fn from_clock() -> Self {
        let value = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| (d.as_secs() ^ u64::from(d.subsec_nanos())) >> 1)
            .unwrap_or(0);

        Self {
            value,
            source: SeedSource::Clock,
        }
    }

    /// Use `explicit` when given, otherwise the clock
    pub fn resolve(explicit: Option<u64>) -> Self {
        explicit.map(Self::explicit).unwrap_or_else(Self::from_clock)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn source(&self) -> SeedSource {
        self.source
    }
}

/// Deterministic generator handed to every entry point through the context.
#[derive(Debug)]
pub struct TestRng {
    inner: StdRng,
}

impl TestRng {
    pub fn new(seed: Seed) -> Self {
        Self::from_seed_value(seed.value())
    }

    pub fn from_seed_value(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[0, u32::MAX)`
    pub fn random_u32(&mut self) -> u32 {
        self.inner.random_range(0..u32::MAX)
    }

    /// Uniform integer in `[0, i64::MAX)`
    pub fn random_u64(&mut self) -> u64 {
        self.inner.random_range(0..i64::MAX as u64)
    }

    /// `width` characters, each drawn uniformly from `'!'..='~'`
    pub fn random_string(&mut self, width: usize) -> String {
        (0..width)
            .map(|_| char::from(self.inner.random_range(PRINTABLE_MIN..=PRINTABLE_MAX)))
            .collect()
    }
}
