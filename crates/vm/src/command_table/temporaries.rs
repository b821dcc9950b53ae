//! Temporary variable commands. Ids outside the addressable set fault the
//! script with `InvalidTemporary`.

use crate::command_table::CommandTableBuilder;
use crate::error::ScriptResult;
use crate::execution_context::ScriptExecutionContext;
use crate::execution_mode::CommandStatus;
use crate::op_code::OpCode;

/// Registers all temporary variable handlers with the table builder.
pub fn register_handlers(builder: &mut CommandTableBuilder) {
    builder.set(OpCode::SetTemp, set_temp);
    builder.set(OpCode::LoadTemp, load_temp);
    builder.set(OpCode::StoreTemp, store_temp);
}

/// `set_temp var:u16 value:u16`
pub fn set_temp(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let var = context.read_u16()?;
    let value = context.read_u16()?;
    context.write_temporary(var, value)?;
    Ok(CommandStatus::Continue)
}

/// `load_temp bank:u8 var:u16` widens the temporary into a bank.
pub fn load_temp(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let bank = context.read_u8()? as usize;
    let var = context.read_u16()?;
    let value = context.read_temporary(var)?;
    context.write_variable(bank, u32::from(value))?;
    Ok(CommandStatus::Continue)
}

/// `store_temp var:u16 bank:u8` keeps the low 16 bits of the bank.
pub fn store_temp(context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
    let var = context.read_u16()?;
    let bank = context.read_u8()? as usize;
    let value = context.read_variable(bank)? as u16;
    context.write_temporary(var, value)?;
    Ok(CommandStatus::Continue)
}
