//! Script builder module for the script engine.
//!
//! This module provides a way to programmatically assemble byte streams for the
//! core command table.

use crate::op_code::{Condition, OpCode};
use crate::script::Script;

/// Helps construct scripts programmatically.
#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    /// The script being built
    script: Vec<u8>,
}

impl ScriptBuilder {
    /// Creates a new script builder.
    pub fn new() -> Self {
        Self { script: Vec::new() }
    }

    /// Current length, i.e. the offset the next emitted byte will have.
    pub fn offset(&self) -> usize {
        self.script.len()
    }

    /// Emits a single byte to the script.
    pub fn emit(&mut self, byte: u8) -> &mut Self {
        self.script.push(byte);
        self
    }

    /// Emits an opcode to the script.
    pub fn emit_opcode(&mut self, op: OpCode) -> &mut Self {
        self.emit(op.into())
    }

    /// Emits raw bytes to the script.
    pub fn emit_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.script.extend_from_slice(bytes);
        self
    }

    pub fn emit_u16(&mut self, value: u16) -> &mut Self {
        self.emit_bytes(&value.to_le_bytes())
    }

    pub fn emit_u32(&mut self, value: u32) -> &mut Self {
        self.emit_bytes(&value.to_le_bytes())
    }

    /// Overwrites a previously emitted `u32`, used to resolve forward jumps.
    ///
    /// # Panics
    ///
    /// Panics if `at + 4` is past the end of the script.
    pub fn patch_u32(&mut self, at: usize, value: u32) -> &mut Self {
        self.script[at..at + 4].copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn nop(&mut self) -> &mut Self {
        self.emit_opcode(OpCode::Nop)
    }

    pub fn end(&mut self) -> &mut Self {
        self.emit_opcode(OpCode::End)
    }

    pub fn return_(&mut self) -> &mut Self {
        self.emit_opcode(OpCode::Return)
    }

    pub fn call(&mut self, target: u32) -> &mut Self {
        self.emit_opcode(OpCode::Call).emit_u32(target)
    }

    pub fn goto(&mut self, target: u32) -> &mut Self {
        self.emit_opcode(OpCode::Goto).emit_u32(target)
    }

    pub fn goto_if(&mut self, condition: Condition, target: u32) -> &mut Self {
        self.emit_opcode(OpCode::GotoIf)
            .emit(condition.into())
            .emit_u32(target)
    }

    pub fn call_if(&mut self, condition: Condition, target: u32) -> &mut Self {
        self.emit_opcode(OpCode::CallIf)
            .emit(condition.into())
            .emit_u32(target)
    }

    pub fn load_bank(&mut self, bank: u8, value: u32) -> &mut Self {
        self.emit_opcode(OpCode::LoadBank).emit(bank).emit_u32(value)
    }

    pub fn compare_bank(&mut self, bank: u8, value: u32) -> &mut Self {
        self.emit_opcode(OpCode::CompareBank)
            .emit(bank)
            .emit_u32(value)
    }

    pub fn add_bank(&mut self, bank: u8, value: u32) -> &mut Self {
        self.emit_opcode(OpCode::AddBank).emit(bank).emit_u32(value)
    }

    pub fn copy_bank(&mut self, destination: u8, source: u8) -> &mut Self {
        self.emit_opcode(OpCode::CopyBank)
            .emit(destination)
            .emit(source)
    }

    pub fn wait(&mut self) -> &mut Self {
        self.emit_opcode(OpCode::Wait)
    }

    pub fn lock_input(&mut self) -> &mut Self {
        self.emit_opcode(OpCode::LockInput)
    }

    pub fn release_input(&mut self) -> &mut Self {
        self.emit_opcode(OpCode::ReleaseInput)
    }

    pub fn face(&mut self, direction: u8) -> &mut Self {
        self.emit_opcode(OpCode::Face).emit(direction)
    }

    pub fn set_temp(&mut self, var: u16, value: u16) -> &mut Self {
        self.emit_opcode(OpCode::SetTemp).emit_u16(var).emit_u16(value)
    }

    pub fn load_temp(&mut self, bank: u8, var: u16) -> &mut Self {
        self.emit_opcode(OpCode::LoadTemp).emit(bank).emit_u16(var)
    }

    pub fn store_temp(&mut self, var: u16, bank: u8) -> &mut Self {
        self.emit_opcode(OpCode::StoreTemp).emit_u16(var).emit(bank)
    }

    /// Returns a copy of the bytes emitted so far.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.script.clone()
    }

    pub fn to_script(&self) -> Script {
        Script::new(self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_sizes_match_opcodes() {
        let mut builder = ScriptBuilder::new();
        builder
            .nop()
            .end()
            .return_()
            .call(0)
            .goto(0)
            .goto_if(Condition::Less, 0)
            .call_if(Condition::Equal, 0)
            .load_bank(0, 0)
            .compare_bank(0, 0)
            .add_bank(0, 0)
            .copy_bank(0, 1)
            .wait()
            .lock_input()
            .release_input()
            .face(1)
            .set_temp(0x8000, 1)
            .load_temp(0, 0x8000)
            .store_temp(0x8000, 0);

        let expected: usize = OpCode::ALL.iter().map(|opcode| opcode.size()).sum();
        assert_eq!(builder.offset(), expected);
    }

    #[test]
    fn test_operands_little_endian() {
        let mut builder = ScriptBuilder::new();
        builder.load_bank(2, 0x0102_0304);
        assert_eq!(builder.to_bytes(), vec![0x07, 0x02, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_temporary_operand_order() {
        let mut builder = ScriptBuilder::new();
        builder.set_temp(0x800D, 0x0102).store_temp(0x8001, 3);
        assert_eq!(
            builder.to_bytes(),
            vec![0x0F, 0x0D, 0x80, 0x02, 0x01, 0x11, 0x01, 0x80, 0x03]
        );
    }

    #[test]
    fn test_patch_forward_reference() {
        let mut builder = ScriptBuilder::new();
        builder.goto(0);
        let label = builder.offset();
        builder.nop();
        builder.patch_u32(1, label as u32);

        assert_eq!(builder.to_bytes(), vec![0x04, 0x05, 0x00, 0x00, 0x00, 0x00]);
    }
}
