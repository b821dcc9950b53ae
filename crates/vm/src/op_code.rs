//! Opcodes of the core command table.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Opcodes understood by [`CommandTable::core`](crate::CommandTable::core).
///
/// Operands are little endian; addresses are `u32` offsets into the running script.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum OpCode {
    Nop = 0x00,
    End = 0x01,
    Return = 0x02,
    /// `call addr:u32`
    Call = 0x03,
    /// `goto addr:u32`
    Goto = 0x04,
    /// `goto_if cond:u8 addr:u32`
    GotoIf = 0x05,
    /// `call_if cond:u8 addr:u32`
    CallIf = 0x06,
    /// `load_bank bank:u8 value:u32`
    LoadBank = 0x07,
    /// `compare_bank bank:u8 value:u32`
    CompareBank = 0x08,
    /// `add_bank bank:u8 value:u32`
    AddBank = 0x09,
    /// `copy_bank dst:u8 src:u8`
    CopyBank = 0x0A,
    Wait = 0x0B,
    LockInput = 0x0C,
    ReleaseInput = 0x0D,
    /// `face direction:u8`
    Face = 0x0E,
    /// `set_temp var:u16 value:u16`
    SetTemp = 0x0F,
    /// `load_temp bank:u8 var:u16`
    LoadTemp = 0x10,
    /// `store_temp var:u16 bank:u8`
    StoreTemp = 0x11,
}

impl OpCode {
    pub const ALL: [OpCode; 18] = [
        OpCode::Nop,
        OpCode::End,
        OpCode::Return,
        OpCode::Call,
        OpCode::Goto,
        OpCode::GotoIf,
        OpCode::CallIf,
        OpCode::LoadBank,
        OpCode::CompareBank,
        OpCode::AddBank,
        OpCode::CopyBank,
        OpCode::Wait,
        OpCode::LockInput,
        OpCode::ReleaseInput,
        OpCode::Face,
        OpCode::SetTemp,
        OpCode::LoadTemp,
        OpCode::StoreTemp,
    ];

    /// Total encoded size including the opcode byte.
    pub fn size(self) -> usize {
        match self {
            OpCode::Nop
            | OpCode::End
            | OpCode::Return
            | OpCode::Wait
            | OpCode::LockInput
            | OpCode::ReleaseInput => 1,
            OpCode::Face => 2,
            OpCode::CopyBank => 3,
            OpCode::LoadTemp | OpCode::StoreTemp => 4,
            OpCode::SetTemp => 5,
            OpCode::Call | OpCode::Goto => 5,
            OpCode::GotoIf
            | OpCode::CallIf
            | OpCode::LoadBank
            | OpCode::CompareBank
            | OpCode::AddBank => 6,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Nop => "nop",
            OpCode::End => "end",
            OpCode::Return => "return",
            OpCode::Call => "call",
            OpCode::Goto => "goto",
            OpCode::GotoIf => "goto_if",
            OpCode::CallIf => "call_if",
            OpCode::LoadBank => "load_bank",
            OpCode::CompareBank => "compare_bank",
            OpCode::AddBank => "add_bank",
            OpCode::CopyBank => "copy_bank",
            OpCode::Wait => "wait",
            OpCode::LockInput => "lock_input",
            OpCode::ReleaseInput => "release_input",
            OpCode::Face => "face",
            OpCode::SetTemp => "set_temp",
            OpCode::LoadTemp => "load_temp",
            OpCode::StoreTemp => "store_temp",
        }
    }
}

/// Condition codes tested against the comparison result.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum Condition {
    Less = 0,
    Equal = 1,
    Greater = 2,
    LessOrEqual = 3,
    GreaterOrEqual = 4,
    NotEqual = 5,
}

/// Comparison result values written by `compare_bank`.
pub mod comparison {
    pub const LESS: u8 = 0;
    pub const EQUAL: u8 = 1;
    pub const GREATER: u8 = 2;
}

impl Condition {
    /// Evaluates the condition against a comparison result byte.
    pub fn holds(self, comparison_result: u8) -> bool {
        use comparison::*;
        match self {
            Condition::Less => comparison_result == LESS,
            Condition::Equal => comparison_result == EQUAL,
            Condition::Greater => comparison_result == GREATER,
            Condition::LessOrEqual => matches!(comparison_result, LESS | EQUAL),
            Condition::GreaterOrEqual => matches!(comparison_result, GREATER | EQUAL),
            Condition::NotEqual => comparison_result != EQUAL,
        }
    }
}
