use forkcheck_lib::{check, check_eq, check_ok, check_quiet, check_some, note};
use forkcheck_lib::{Ctx, Fixture, Outcome, Registry};
use nix::sys::signal::{raise, signal, SigHandler, Signal};
use std::io::{self, Write};

/// Lines printed by `noisy`
const NOISY_LINES: usize = 2000;

struct Numbers {
    values: Vec<u32>,
}

pub fn register(registry: &mut Registry) {
    registry
        .suite("basics")
        .setup(setup_env, teardown_env)
        .test("pass", pass)
        .test("fail", fail)
        .test("quiet", quiet)
        .test("panic", panics)
        .test("segfault", segfault)
        .test("noisy", noisy)
        .test("stderr", stderr);
}

fn setup_env(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    fixture.install(Numbers {
        values: vec![1, 2, 3],
    });
    Ok(())
}

fn teardown_env(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let numbers = fixture.take::<Numbers>()?;
    check_eq!(numbers.values.len(), 3);
    Ok(())
}

fn pass(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let numbers = fixture.get::<Numbers>()?;
    check_eq!(numbers.values.iter().sum::<u32>(), 6);
    let last = check_some!(numbers.values.last());
    check!(*last == 3);
    Ok(())
}

fn fail(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let numbers = fixture.get::<Numbers>()?;
    check_eq!(numbers.values.len(), 4);
    note!("not reached");
    Ok(())
}

fn quiet(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    check_quiet!(false);
    Ok(())
}

fn panics(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    panic!("deliberate panic in a test body")
}

fn segfault(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    // The Rust runtime's own SIGSEGV handler would swallow a raised signal
    // SAFETY: restoring the default disposition installs no Rust code.
    check_ok!(unsafe { signal(Signal::SIGSEGV, SigHandler::SigDfl) });
    check_ok!(raise(Signal::SIGSEGV));
    note!("still alive after SIGSEGV");
    Ok(())
}

fn noisy(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    let mut out = io::stdout().lock();
    for i in 0..NOISY_LINES {
        check_ok!(writeln!(out, "noisy line {}", i));
    }
    Ok(())
}

fn stderr(_ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    eprintln!("written to stderr");
    Ok(())
}
