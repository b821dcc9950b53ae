//! Player input override commands. The context only stores these flags; the
//! host input system reads them each tick.

use crate::command_table::CommandTableBuilder;
use crate::error::ScriptResult;
use crate::execution_context::ScriptExecutionContext;
use crate::execution_mode::CommandStatus;
use crate::op_code::OpCode;

/// Registers all input handlers with the table builder.
pub fn register_handlers(builder: &mut CommandTableBuilder) {
    builder.set(OpCode::LockInput, lock_input);
    builder.set(OpCode::ReleaseInput, release_input);
    builder.set(OpCode::Face, face);
}

pub fn lock_input(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    context.set_input_control(false);
    Ok(CommandStatus::Continue)
}

/// Hands movement back to the player and clears any forced direction.
pub fn release_input(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    context.set_input_control(true);
    context.set_input_override_direction(0);
    Ok(CommandStatus::Continue)
}

pub fn face(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let direction = context.read_u8()?;
    context.set_input_override_direction(direction);
    Ok(CommandStatus::Continue)
}
