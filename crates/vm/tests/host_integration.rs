//! Integration tests for the host run loop and the debugger.

use overworld_vm::{
    CommandTable, Condition, ContextConfig, DebugStop, DispatchPolicy, EngineConfig,
    ScriptBuilder, ScriptDebugger, ScriptExecutionContext, ScriptHost, StepOutcome,
};

/// Counts bank 1 up to `limit`, suspending once per iteration.
fn counting_script(limit: u32) -> ScriptBuilder {
    let mut builder = ScriptBuilder::new();
    let top = builder.offset() as u32;
    builder
        .add_bank(1, 1)
        .wait()
        .compare_bank(1, limit)
        .goto_if(Condition::Less, top)
        .end();
    builder
}

#[test]
fn test_host_ticks_until_suspend_policy() {
    let config = EngineConfig {
        primary: ContextConfig {
            dispatch: DispatchPolicy::UntilSuspend,
            ..ContextConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut host = ScriptHost::new(&config);
    host.primary_mut()
        .start(counting_script(3).to_script(), CommandTable::core())
        .unwrap();

    let mut suspends = 0;
    for _ in 0..16 {
        match host.tick().primary.unwrap() {
            StepOutcome::Suspended => {
                suspends += 1;
                host.primary_mut().resume().unwrap();
            }
            StepOutcome::Halted => break,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(suspends, 3);
    assert_eq!(host.primary().read_variable(1).unwrap(), 3);
    assert_eq!(host.faults(), 0);
}

#[test]
fn test_disabled_level_context_stays_idle() {
    let config = EngineConfig {
        level: ContextConfig {
            enabled: false,
            ..ContextConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut host = ScriptHost::new(&config);
    assert!(host
        .level_mut()
        .start(counting_script(1).to_script(), CommandTable::core())
        .is_err());
    assert_eq!(host.tick().level, Ok(StepOutcome::Idle));
}

#[test]
fn test_debugger_walks_loop() {
    let builder = counting_script(2);
    let mut context = ScriptExecutionContext::new("debug");
    context
        .start(builder.to_script(), CommandTable::core())
        .unwrap();

    let mut debugger = ScriptDebugger::new(context);
    // Offset of compare_bank: add_bank (6) + wait (1).
    debugger.add_breakpoint(7);

    assert_eq!(debugger.execute(100), DebugStop::Suspended);
    debugger.context_mut().resume().unwrap();
    assert_eq!(debugger.execute(100), DebugStop::Breakpoint(7));
    assert_eq!(debugger.context().read_variable(1).unwrap(), 1);

    assert_eq!(debugger.execute(100), DebugStop::Suspended);
    debugger.context_mut().resume().unwrap();
    assert_eq!(debugger.execute(100), DebugStop::Breakpoint(7));

    debugger.remove_breakpoint(7);
    assert_eq!(debugger.execute(100), DebugStop::Halted);
    assert_eq!(debugger.into_context().read_variable(1).unwrap(), 2);
}
