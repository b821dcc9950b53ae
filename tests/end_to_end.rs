//! End-to-end tests through the facade crate.

use overworld_rs::prelude::*;
use overworld_rs::vm::{Condition, DebugStop, ScriptDebugger};

/// Branches on bank 1 and records which arm ran in bank 2.
fn branching_script(threshold: u32) -> Script {
    let mut builder = ScriptBuilder::new();
    builder
        .compare_bank(1, threshold)
        .goto_if(Condition::GreaterOrEqual, 0);
    let patch_at = builder.offset() - 4;
    builder.load_bank(2, 1).end();
    let high = builder.offset();
    builder.load_bank(2, 2).end();
    builder.patch_u32(patch_at, high as u32);
    builder.to_script()
}

fn run_to_end(context: &mut ScriptExecutionContext) -> StepOutcome {
    loop {
        match context.step().expect("script should not fault") {
            StepOutcome::Running => continue,
            outcome => return outcome,
        }
    }
}

#[test]
fn test_branch_on_preloaded_bank() {
    for (bank, expected) in [(0, 1), (4, 1), (5, 2), (9, 2)] {
        let mut context = ScriptExecutionContext::new("primary");
        context.write_variable(1, bank).unwrap();
        context
            .start(branching_script(5), CommandTable::core())
            .unwrap();

        assert_eq!(run_to_end(&mut context), StepOutcome::Halted);
        assert_eq!(context.read_variable(2).unwrap(), expected, "bank 1 = {bank}");
    }
}

#[test]
fn test_subroutine_nesting_to_capacity() {
    // A subroutine that calls itself until the stack is full.
    let mut builder = ScriptBuilder::new();
    builder.add_bank(0, 1).call(0);
    let mut context = ScriptExecutionContext::new("primary");
    context
        .start(builder.to_script(), CommandTable::core())
        .unwrap();

    let err = loop {
        match context.step() {
            Ok(StepOutcome::Running) => continue,
            Ok(outcome) => panic!("unexpected outcome {outcome:?}"),
            Err(err) => break err,
        }
    };

    assert_eq!(
        err,
        ScriptError::StackOverflow {
            capacity: overworld_rs::config::STACK_CAPACITY
        }
    );
    assert_eq!(context.depth(), overworld_rs::config::STACK_CAPACITY);
    assert_eq!(
        context.read_variable(0).unwrap(),
        overworld_rs::config::STACK_CAPACITY as u32 + 1
    );
    assert_eq!(context.mode(), ExecutionMode::Paused);
}

#[test]
fn test_config_drives_host() {
    let config = EngineConfig::from_toml_str(
        r#"
        [primary]
        dispatch = "until-suspend"
        "#,
    )
    .unwrap();
    let mut host = ScriptHost::new(&config);
    host.primary_mut().write_variable(1, 7).unwrap();
    host.primary_mut()
        .start(branching_script(5), CommandTable::core())
        .unwrap();

    assert_eq!(host.tick().primary, Ok(StepOutcome::Halted));
    assert_eq!(host.primary().read_variable(2).unwrap(), 2);
}

#[test]
fn test_debugger_through_facade() {
    let mut context = ScriptExecutionContext::new("debug");
    context
        .start(branching_script(5), CommandTable::core())
        .unwrap();
    let mut debugger = ScriptDebugger::new(context);
    // compare_bank (6 bytes) + goto_if (6 bytes) lands on the low arm.
    debugger.add_breakpoint(12);

    assert_eq!(debugger.execute(50), DebugStop::Breakpoint(12));
    assert_eq!(debugger.execute(50), DebugStop::Halted);
    assert_eq!(debugger.context().read_variable(2).unwrap(), 1);
}

#[test]
fn test_host_argument_reaches_script_through_temporary() {
    let mut host = ScriptHost::default();
    host.set_temporary(0x8001, 4).unwrap();

    let mut builder = ScriptBuilder::new();
    builder
        .load_temp(1, 0x8001)
        .compare_bank(1, 5)
        .goto_if(Condition::Less, 0);
    let patch_at = builder.offset() - 4;
    builder.set_temp(RESULT_VAR, 0).end();
    let low = builder.offset();
    builder.set_temp(RESULT_VAR, 1).end();
    builder.patch_u32(patch_at, low as u32);
    host.primary_mut()
        .start(builder.to_script(), CommandTable::core())
        .unwrap();

    while host.tick().primary == Ok(StepOutcome::Running) {}
    assert_eq!(host.temporary(RESULT_VAR).unwrap(), 1);
    assert_eq!(host.temporaries(), host.level().temporaries());
    assert_ne!(host.temporaries(), TemporaryVars::default());
}
