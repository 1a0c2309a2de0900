use forkcheck_lib::{check, check_ok, note};
use forkcheck_lib::{Ctx, Fixture, Outcome, Registry};

/// Environment variable that must be set for this suite's setup to pass
const REQUIRED_VAR: &str = "FORKCHECK_BROKEN_ENV";

struct Workdir {
    path: String,
}

pub fn register(registry: &mut Registry) {
    registry
        .suite("broken")
        .setup(setup_env, teardown_env)
        .test("needs_env", needs_env);
}

fn setup_env(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let value = std::env::var(REQUIRED_VAR).unwrap_or_default();
    check!(!value.is_empty(), "{} is not set", REQUIRED_VAR);
    fixture.install(Workdir { path: value });
    Ok(())
}

fn teardown_env(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    if fixture.is_empty() {
        note!("nothing to tear down");
        return Ok(());
    }
    let workdir = fixture.take::<Workdir>()?;
    note!("released {}", workdir.path);
    Ok(())
}

fn needs_env(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let workdir = fixture.get::<Workdir>()?;
    check_ok!(std::env::var(REQUIRED_VAR).map(|v| v == workdir.path));
    Ok(())
}
