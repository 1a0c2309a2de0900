use forkcheck_lib::{check, check_eq, check_lt, note};
use forkcheck_lib::{Ctx, Fixture, Outcome, Registry};

const KEY_WIDTH: usize = 16;

/// Keys generated once in setup and shared by the suite
struct Keys {
    keys: Vec<String>,
}

pub fn register(registry: &mut Registry) {
    registry
        .suite("random")
        .setup(setup_env, teardown_env)
        .test("numbers", numbers)
        .test("strings", strings);
}

fn setup_env(ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let keys = (0..4).map(|_| ctx.random_string(KEY_WIDTH)).collect();
    fixture.install(Keys { keys });
    Ok(())
}

fn teardown_env(_ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    fixture.take::<Keys>()?;
    Ok(())
}

fn numbers(ctx: &mut Ctx, _fixture: &mut Fixture) -> Outcome {
    let small = ctx.random_u32();
    let large = ctx.random_u64();
    check_lt!(small, u32::MAX);
    check_lt!(large, i64::MAX as u64);
    note!("drew {} and {}", small, large);
    Ok(())
}

fn strings(ctx: &mut Ctx, fixture: &mut Fixture) -> Outcome {
    let keys = fixture.get::<Keys>()?;
    for key in &keys.keys {
        check_eq!(key.len(), KEY_WIDTH);
        check!(key.chars().all(|c| ('!'..='~').contains(&c)), "key {:?}", key);
    }

    let fresh = ctx.random_string(KEY_WIDTH);
    note!("first key {}, fresh key {}", keys.keys[0], fresh);
    Ok(())
}
