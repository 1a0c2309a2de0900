use crate::common::TestRoot;
use forkcheck_lib::config::Isolation;
use forkcheck_lib::{check, check_eq, check_some, note};
use forkcheck_lib::{Crash, Ctx, Fixture, Outcome, Registry, Selection, Status, SuiteReport, TestOutcome};
use nix::sys::signal::Signal;
use serial_test::serial;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

static TEST_BODIES: AtomicUsize = AtomicUsize::new(0);

fn install_empty(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    fixture.install(Vec::<String>::new());
    Ok(())
}

fn drop_fixture(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    fixture.clear();
    Ok(())
}

fn a_push(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    TEST_BODIES.fetch_add(1, Ordering::SeqCst);
    let entries = fixture.get_mut::<Vec<String>>()?;
    entries.push("pushed by a_push".to_string());
    check_eq!(entries.len(), 1);
    Ok(())
}

fn b_still_empty(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    TEST_BODIES.fetch_add(1, Ordering::SeqCst);
    let entries = fixture.get::<Vec<String>>()?;
    check_eq!(entries.len(), 0);
    Ok(())
}

fn aborts(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    std::process::abort()
}

fn exits_three(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    std::process::exit(3)
}

fn loud(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    let _ = io::stdout().write_all(b"marker-on-stdout\n");
    let _ = io::stderr().write_all(b"marker-on-stderr\n");
    Ok(())
}

fn silent(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    Ok(())
}

fn knows_itself(ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    check_eq!(ctx.suite(), "iso");
    let test = check_some!(ctx.test());
    check_eq!(test, "knows_itself");
    Ok(())
}

fn draws(ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    let value = ctx.random_u64();
    check!(value < i64::MAX as u64);
    note!("drew {}", value);
    Ok(())
}

fn snapshot_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .suite("snap")
        .setup(install_empty, drop_fixture)
        .test("a_push", a_push)
        .test("b_still_empty", b_still_empty);
    registry
}

fn iso_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .suite("iso")
        .setup(install_empty, drop_fixture)
        .test("aborts", aborts)
        .test("draws", draws)
        .test("exits_three", exits_three)
        .test("knows_itself", knows_itself)
        .test("loud", loud)
        .test("silent", silent);
    registry
}

fn iso_root() -> TestRoot {
    TestRoot::new().suite(
        "iso",
        &["aborts", "draws", "exits_three", "knows_itself", "loud", "silent"],
    )
}

fn outcome(suite: &SuiteReport, test: &str) -> TestOutcome {
    suite.test(test).unwrap().outcome.clone()
}

#[test]
#[serial]
fn test_forked_tests_see_setup_snapshot_only() {
    TEST_BODIES.store(0, Ordering::SeqCst);
    let root = TestRoot::new().suite("snap", &["a_push", "b_still_empty"]);
    let suite = root.run_suite(&snapshot_registry(), "snap");

    assert!(suite.tests.iter().all(|t| t.outcome.is_pass()));
    // The bodies ran in children, so the parent's counter never moved
    assert_eq!(TEST_BODIES.load(Ordering::SeqCst), 0);
}

#[test]
#[serial]
fn test_inline_tests_share_the_fixture() {
    TEST_BODIES.store(0, Ordering::SeqCst);
    let root = TestRoot::new().suite("snap", &["a_push", "b_still_empty"]);
    let (report, _) = root.run(
        &snapshot_registry(),
        Selection::Named(vec!["snap".to_string()]),
        Isolation::Inline,
        1,
    );
    let suite = &report.suites[0];

    assert_eq!(outcome(suite, "a_push"), TestOutcome::Ran(Status::Passed));
    assert_eq!(
        outcome(suite, "b_still_empty"),
        TestOutcome::Ran(Status::AssertionFailed)
    );
    assert_eq!(TEST_BODIES.load(Ordering::SeqCst), 2);
}

#[test]
#[serial]
fn test_signal_and_exit_status_are_contained() {
    let root = iso_root();
    let suite = root.run_suite(&iso_registry(), "iso");

    assert_eq!(
        outcome(&suite, "aborts"),
        TestOutcome::Ran(Status::Crashed(Crash::Signal(Signal::SIGABRT)))
    );
    assert_eq!(
        outcome(&suite, "exits_three"),
        TestOutcome::Ran(Status::Crashed(Crash::Exit(3)))
    );

    // Everything after the crashes still ran
    assert!(suite.test("knows_itself").unwrap().outcome.is_pass());
    assert!(suite.test("silent").unwrap().outcome.is_pass());
    assert_eq!(suite.teardown, Status::Passed);
}

#[test]
#[serial]
fn test_transcripts_do_not_leak_between_tests() {
    let root = iso_root();
    let suite = root.run_suite(&iso_registry(), "iso");

    let loud = suite.test("loud").unwrap();
    assert!(loud.transcript.contains(b"marker-on-stdout"));
    assert!(loud.transcript.contains(b"marker-on-stderr"));

    for other in ["aborts", "draws", "exits_three", "knows_itself", "silent"] {
        let transcript = &suite.test(other).unwrap().transcript;
        assert!(!transcript.contains(b"marker-on"), "{} saw loud's output", other);
    }
}

#[test]
#[serial]
fn test_same_seed_same_draws() {
    let root = iso_root();
    let draw = |seed| {
        let (report, _) = root.run(
            &iso_registry(),
            Selection::Named(vec!["iso".to_string()]),
            Isolation::Fork,
            seed,
        );
        let transcript = &report.suites[0].test("draws").unwrap().transcript;
        let line = transcript
            .lines()
            .find(|line| line.windows(4).any(|w| w == b"drew"))
            .map(|line| line.to_vec())
            .unwrap();
        line
    };

    assert_eq!(draw(99), draw(99));
    assert_ne!(draw(99), draw(100));
}
