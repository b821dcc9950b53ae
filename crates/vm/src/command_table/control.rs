//! Control flow commands: termination, jumps, calls and waiting.

use crate::command_table::CommandTableBuilder;
use crate::error::{Corruption, ScriptError, ScriptResult};
use crate::execution_context::ScriptExecutionContext;
use crate::execution_mode::CommandStatus;
use crate::op_code::{Condition, OpCode};

/// Registers all control flow handlers with the table builder.
pub fn register_handlers(builder: &mut CommandTableBuilder) {
    builder.set(OpCode::Nop, nop);
    builder.set(OpCode::End, end);
    builder.set(OpCode::Return, return_);
    builder.set(OpCode::Call, call);
    builder.set(OpCode::Goto, goto);
    builder.set(OpCode::GotoIf, goto_if);
    builder.set(OpCode::CallIf, call_if);
    builder.set(OpCode::Wait, wait);
}

pub fn nop(_context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    Ok(CommandStatus::Continue)
}

/// Stops the script; there is nothing left to resume.
pub fn end(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    context.stop();
    Ok(CommandStatus::Continue)
}

pub fn return_(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    context.return_()?;
    Ok(CommandStatus::Continue)
}

pub fn call(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let target = context.read_target()?;
    context.call(target)?;
    Ok(CommandStatus::Continue)
}

pub fn goto(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let target = context.read_target()?;
    context.jump(target)?;
    Ok(CommandStatus::Continue)
}

pub fn goto_if(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let condition = read_condition(context)?;
    let target = context.read_target()?;
    if condition.holds(context.comparison_result()) {
        context.jump(target)?;
    }
    Ok(CommandStatus::Continue)
}

pub fn call_if(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let condition = read_condition(context)?;
    let target = context.read_target()?;
    if condition.holds(context.comparison_result()) {
        context.call(target)?;
    }
    Ok(CommandStatus::Continue)
}

/// Suspends until the host resumes the context.
pub fn wait(_context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    Ok(CommandStatus::Suspend)
}

fn read_condition(context: &mut ScriptExecutionContext) -> ScriptResult<Condition> {
    let at = context
        .instruction_pointer()
        .map(|cursor| cursor.offset())
        .unwrap_or_default();
    let code = context.read_u8()?;
    Condition::try_from(code)
        .map_err(|_| ScriptError::corrupt(at, Corruption::InvalidCondition { code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_table::CommandTable;
    use crate::execution_mode::{ExecutionMode, StepOutcome};
    use crate::op_code::comparison;
    use crate::script::Script;
    use crate::script_builder::ScriptBuilder;

    fn run_to_pause(context: &mut ScriptExecutionContext) -> StepOutcome {
        for _ in 0..64 {
            let outcome = context.step().expect("script should not fault");
            if outcome != StepOutcome::Running {
                return outcome;
            }
        }
        panic!("script did not pause");
    }

    #[test]
    fn test_goto_skips_instructions() {
        let mut builder = ScriptBuilder::new();
        builder.goto(11).load_bank(0, 1).end();
        let mut context = ScriptExecutionContext::new("test");
        context
            .start(builder.to_script(), CommandTable::core())
            .unwrap();

        assert_eq!(run_to_pause(&mut context), StepOutcome::Halted);
        assert_eq!(context.read_variable(0).unwrap(), 0);
    }

    #[test]
    fn test_goto_if_follows_comparison() {
        let mut builder = ScriptBuilder::new();
        builder
            .load_bank(1, 3)
            .compare_bank(1, 3)
            .goto_if(Condition::Equal, 0);
        let equal_jump = builder.offset() - 4;
        builder.load_bank(2, 0xbad).end();
        let target = builder.offset();
        builder.load_bank(2, 0x600d).end();
        builder.patch_u32(equal_jump, target as u32);

        let mut context = ScriptExecutionContext::new("test");
        context
            .start(builder.to_script(), CommandTable::core())
            .unwrap();

        assert_eq!(run_to_pause(&mut context), StepOutcome::Halted);
        assert_eq!(context.comparison_result(), comparison::EQUAL);
        assert_eq!(context.read_variable(2).unwrap(), 0x600d);
    }

    #[test]
    fn test_call_if_not_taken() {
        let mut builder = ScriptBuilder::new();
        builder
            .compare_bank(0, 1)
            .call_if(Condition::Greater, 0)
            .end();

        let mut context = ScriptExecutionContext::new("test");
        context
            .start(builder.to_script(), CommandTable::core())
            .unwrap();

        assert_eq!(run_to_pause(&mut context), StepOutcome::Halted);
        assert_eq!(context.depth(), 0);
    }

    #[test]
    fn test_unknown_condition_is_corrupt() {
        let script = Script::new(vec![OpCode::GotoIf.into(), 9, 0, 0, 0, 0]);
        let mut context = ScriptExecutionContext::new("test");
        context.start(script, CommandTable::core()).unwrap();

        let err = context.step().unwrap_err();
        assert_eq!(
            err,
            ScriptError::corrupt(1, Corruption::InvalidCondition { code: 9 })
        );
        assert_eq!(context.mode(), ExecutionMode::Paused);
    }

    #[test]
    fn test_goto_outside_script_is_corrupt() {
        let mut builder = ScriptBuilder::new();
        builder.goto(0x100);

        let mut context = ScriptExecutionContext::new("test");
        context
            .start(builder.to_script(), CommandTable::core())
            .unwrap();

        let err = context.step().unwrap_err();
        assert_eq!(
            err,
            ScriptError::corrupt(
                1,
                Corruption::TargetOutOfBounds {
                    target: 0x100,
                    len: 5
                }
            )
        );
    }

    #[test]
    fn test_return_without_call_faults() {
        let script = Script::new(vec![OpCode::Return.into()]);
        let mut context = ScriptExecutionContext::new("test");
        context.start(script, CommandTable::core()).unwrap();

        assert_eq!(context.step().unwrap_err(), ScriptError::StackUnderflow);
        assert_eq!(context.mode(), ExecutionMode::Paused);
        assert_eq!(context.last_fault(), Some(&ScriptError::StackUnderflow));
    }

    #[test]
    fn test_end_halts_without_parking() {
        let script = Script::new(vec![OpCode::End.into(), OpCode::Nop.into()]);
        let mut context = ScriptExecutionContext::new("test");
        context.start(script, CommandTable::core()).unwrap();

        assert_eq!(context.step().unwrap(), StepOutcome::Halted);
        assert!(context.parked().is_none());
        assert_eq!(context.resume().unwrap_err(), ScriptError::NothingToResume);
    }
}
