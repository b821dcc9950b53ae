//! Variable bank commands.

use crate::command_table::CommandTableBuilder;
use crate::error::ScriptResult;
use crate::execution_context::ScriptExecutionContext;
use crate::execution_mode::CommandStatus;
use crate::op_code::{comparison, OpCode};
use std::cmp::Ordering;

/// Registers all bank handlers with the table builder.
pub fn register_handlers(builder: &mut CommandTableBuilder) {
    builder.set(OpCode::LoadBank, load_bank);
    builder.set(OpCode::CompareBank, compare_bank);
    builder.set(OpCode::AddBank, add_bank);
    builder.set(OpCode::CopyBank, copy_bank);
}

/// `load_bank bank:u8 value:u32`. Bank 0 conventionally receives message offsets.
pub fn load_bank(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let bank = context.read_u8()? as usize;
    let value = context.read_u32()?;
    context.write_variable(bank, value)?;
    Ok(CommandStatus::Continue)
}

/// `compare_bank bank:u8 value:u32` stores less/equal/greater in the comparison result.
pub fn compare_bank(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let bank = context.read_u8()? as usize;
    let value = context.read_u32()?;
    let result = match context.read_variable(bank)?.cmp(&value) {
        Ordering::Less => comparison::LESS,
        Ordering::Equal => comparison::EQUAL,
        Ordering::Greater => comparison::GREATER,
    };
    context.set_comparison_result(result);
    Ok(CommandStatus::Continue)
}

pub fn add_bank(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let bank = context.read_u8()? as usize;
    let value = context.read_u32()?;
    let sum = context.read_variable(bank)?.wrapping_add(value);
    context.write_variable(bank, sum)?;
    Ok(CommandStatus::Continue)
}

/// `copy_bank dst:u8 src:u8`
pub fn copy_bank(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let destination = context.read_u8()? as usize;
    let source = context.read_u8()? as usize;
    let value = context.read_variable(source)?;
    context.write_variable(destination, value)?;
    Ok(CommandStatus::Continue)
}
