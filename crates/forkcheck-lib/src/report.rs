//! Progress output and run results
//!
//! The orchestrator drives a [`Reporter`] with one event per step of a
//! suite's life. [`ConsoleReporter`] prints the familiar line-per-step
//! format:
//!
//! ```text
//! Using seed 42
//! Running test suite table:
//!  verifying setup... OK
//!  test delete... OK
//!  test find... FAIL
//!  | > tests/table/find.rs:12: assert(found == 3) FAILED, 2 == 3 is false
//!  tearing down environment... OK
//! ```

use std::io::{self, Write};

use crate::capture::Transcript;
use crate::executor::Status;
use crate::rng::Seed;

const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// What happened to one test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Ran(Status),
    /// Setup failed, so the test never ran
    Skipped,
}

impl TestOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Ran(status) if status.is_pass())
    }
}

#[derive(Debug, Clone)]
pub struct TestReport {
    pub name: String,
    pub outcome: TestOutcome,
    pub transcript: Transcript,
}

#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub name: String,
    pub setup: Status,
    pub tests: Vec<TestReport>,
    pub teardown: Status,
}

impl SuiteReport {
    pub fn test(&self, name: &str) -> Option<&TestReport> {
        self.tests.iter().find(|t| t.name == name)
    }
}

/// Everything a run produced, in execution order
#[derive(Debug, Clone)]
pub struct RunReport {
    pub seed: Seed,
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    pub fn suite(&self, name: &str) -> Option<&SuiteReport> {
        self.suites.iter().find(|s| s.name == name)
    }
}

/// Receives the steps of a run as they happen.
pub trait Reporter {
    fn run_started(&mut self, seed: Seed) -> io::Result<()>;

    fn suite_started(&mut self, suite: &str) -> io::Result<()>;

    fn setup_started(&mut self, suite: &str) -> io::Result<()>;

    fn setup_finished(&mut self, status: &Status, transcript: &Transcript) -> io::Result<()>;

    fn test_started(&mut self, test: &str) -> io::Result<()>;

    fn test_finished(&mut self, test: &str, status: &Status, transcript: &Transcript) -> io::Result<()>;

    fn test_skipped(&mut self, test: &str) -> io::Result<()>;

    fn teardown_started(&mut self, suite: &str) -> io::Result<()>;

    fn teardown_finished(&mut self, status: &Status, transcript: &Transcript) -> io::Result<()>;

    fn suite_finished(&mut self, _report: &SuiteReport) -> io::Result<()> {
        Ok(())
    }
}

/// Line-oriented reporter for a terminal or pipe.
///
/// Every partial line is flushed before returning, so nothing is pending
/// in `out` when the next capture window opens.
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", style, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn verdict(&self, status: &Status) -> String {
        match status.detail() {
            None if status.is_pass() => self.paint(&format!("{}{}", GREEN, BOLD), "OK"),
            None => self.paint(&format!("{}{}", RED, BOLD), "FAIL"),
            Some(detail) => self.paint(&format!("{}{}", RED, BOLD), &format!("FAIL ({})", detail)),
        }
    }

    fn partial(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    fn transcript(&mut self, transcript: &Transcript) -> io::Result<()> {
        for line in transcript.lines() {
            self.out.write_all(b" | ")?;
            self.out.write_all(line)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, seed: Seed) -> io::Result<()> {
        writeln!(self.out, "Using seed {}", seed.value())?;
        self.out.flush()
    }

    fn suite_started(&mut self, suite: &str) -> io::Result<()> {
        let name = self.paint(BOLD, suite);
        writeln!(self.out, "Running test suite {}:", name)
    }

    fn setup_started(&mut self, _suite: &str) -> io::Result<()> {
        self.partial(" verifying setup... ")
    }

    fn setup_finished(&mut self, status: &Status, transcript: &Transcript) -> io::Result<()> {
        if status.is_pass() {
            let verdict = self.verdict(status);
            writeln!(self.out, "{}", verdict)?;
        } else {
            let verdict = match status.detail() {
                Some(detail) => format!("FAIL ({}) [skipping test suite]", detail),
                None => "FAIL [skipping test suite]".to_string(),
            };
            let verdict = self.paint(&format!("{}{}", RED, BOLD), &verdict);
            writeln!(self.out, "{}", verdict)?;
        }
        self.transcript(transcript)
    }

    fn test_started(&mut self, test: &str) -> io::Result<()> {
        let name = self.paint(ITALIC, test);
        self.partial(&format!(" test {}... ", name))
    }

    fn test_finished(&mut self, _test: &str, status: &Status, transcript: &Transcript) -> io::Result<()> {
        let verdict = self.verdict(status);
        writeln!(self.out, "{}", verdict)?;
        self.transcript(transcript)
    }

    fn test_skipped(&mut self, test: &str) -> io::Result<()> {
        let name = self.paint(ITALIC, test);
        let verdict = self.paint(YELLOW, "SKIPPED");
        writeln!(self.out, " test {}... {}", name, verdict)?;
        self.out.flush()
    }

    fn teardown_started(&mut self, _suite: &str) -> io::Result<()> {
        self.partial(" tearing down environment... ")
    }

    fn teardown_finished(&mut self, status: &Status, transcript: &Transcript) -> io::Result<()> {
        let verdict = self.verdict(status);
        writeln!(self.out, "{}", verdict)?;
        self.transcript(transcript)
    }
}
