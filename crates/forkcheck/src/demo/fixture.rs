//! Forked tests work on a snapshot of the fixture: `a_append` changes its
//! copy, and `b_unchanged` still sees what setup built. Under `--inline`
//! the second test fails.

use forkcheck_lib::{check_eq, note};
use forkcheck_lib::{Ctx, Fixture, Outcome, Registry};

struct Ledger {
    entries: Vec<String>,
}

pub fn register(registry: &mut Registry) {
    registry
        .suite("fixture")
        .setup(setup_env, teardown_env)
        .test("a_append", a_append)
        .test("b_unchanged", b_unchanged);
}

fn setup_env(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let ledger = fixture.install(Ledger {
        entries: Vec::new(),
    });
    ledger.entries.push("opening balance".to_string());
    Ok(())
}

fn teardown_env(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let ledger = fixture.take::<Ledger>()?;
    check_eq!(ledger.entries.len(), 1);
    Ok(())
}

fn a_append(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let ledger = fixture.get_mut::<Ledger>()?;
    ledger.entries.push("written by a_append".to_string());
    check_eq!(ledger.entries.len(), 2);
    note!("ledger now holds {} entries", ledger.entries.len());
    Ok(())
}

fn b_unchanged(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let ledger = fixture.get::<Ledger>()?;
    check_eq!(ledger.entries.len(), 1);
    check_eq!(ledger.entries[0].as_str(), "opening balance");
    Ok(())
}
