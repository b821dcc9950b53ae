//! Command table module for the script engine.
//!
//! A command table maps opcode bytes to handlers. Tables are immutable once
//! built and published behind an [`Arc`]; a context "hot swaps" its table by
//! rebinding that `Arc`, never by mutating a live table.

pub mod banks;
pub mod control;
pub mod input;
pub mod temporaries;

use crate::error::{Corruption, ScriptResult};
use crate::execution_context::ScriptExecutionContext;
use crate::execution_mode::CommandStatus;
use crate::op_code::OpCode;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// A handler for a single opcode. Operands are read from the context cursor.
pub type CommandHandler = fn(&mut ScriptExecutionContext) -> ScriptResult<CommandStatus>;

/// The table every context starts with.
static CORE: Lazy<Arc<CommandTable>> = Lazy::new(|| Arc::new(CommandTable::build_core()));

/// An ordered, bounds-checked set of opcode handlers.
#[derive(Clone)]
pub struct CommandTable {
    name: String,
    /// Entry `n` handles opcode `n`; the slice length is the dispatch bound.
    handlers: Box<[Option<CommandHandler>]>,
}

impl CommandTable {
    /// Starts building a new table.
    pub fn builder(name: impl Into<String>) -> CommandTableBuilder {
        CommandTableBuilder::new(name)
    }

    /// Returns the shared core table.
    pub fn core() -> Arc<CommandTable> {
        Arc::clone(&CORE)
    }

    fn build_core() -> Self {
        let mut builder = CommandTable::builder("core");
        control::register_handlers(&mut builder);
        banks::register_handlers(&mut builder);
        input::register_handlers(&mut builder);
        temporaries::register_handlers(&mut builder);
        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries, i.e. every valid opcode is `< len()`.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// The last valid opcode, if the table has any entries.
    pub fn last_opcode(&self) -> Option<u8> {
        self.handlers.len().checked_sub(1).map(|last| last as u8)
    }

    /// Returns `true` if `opcode` is in range and has a handler.
    pub fn contains(&self, opcode: u8) -> bool {
        self.handler(opcode).is_ok()
    }

    /// Looks up the handler for `opcode`, validating it against the table bound.
    pub fn handler(&self, opcode: u8) -> Result<CommandHandler, Corruption> {
        let entry = self
            .handlers
            .get(opcode as usize)
            .ok_or(Corruption::OpcodeOutOfRange {
                opcode,
                table_len: self.handlers.len(),
            })?;
        entry.ok_or(Corruption::UnassignedOpcode { opcode })
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("name", &self.name)
            .field("len", &self.handlers.len())
            .finish()
    }
}

/// Builds a [`CommandTable`]. Gaps between registered opcodes stay unassigned.
pub struct CommandTableBuilder {
    name: String,
    handlers: Vec<Option<CommandHandler>>,
}

impl CommandTableBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    /// Starts from a copy of an existing table's handlers.
    pub fn from_table(name: impl Into<String>, table: &CommandTable) -> Self {
        Self {
            name: name.into(),
            handlers: table.handlers.to_vec(),
        }
    }

    /// Registers a handler for a raw opcode byte, replacing any previous one.
    pub fn register(&mut self, opcode: u8, handler: CommandHandler) -> &mut Self {
        let index = opcode as usize;
        if self.handlers.len() <= index {
            self.handlers.resize(index + 1, None);
        }
        self.handlers[index] = Some(handler);
        self
    }

    /// Registers a handler for a core opcode.
    pub fn set(&mut self, opcode: OpCode, handler: CommandHandler) -> &mut Self {
        self.register(opcode.into(), handler)
    }

    /// Removes a handler; the table bound is unaffected.
    pub fn unregister(&mut self, opcode: u8) -> &mut Self {
        if let Some(slot) = self.handlers.get_mut(opcode as usize) {
            *slot = None;
        }
        self
    }

    pub fn build(&mut self) -> CommandTable {
        CommandTable {
            name: self.name.clone(),
            handlers: self.handlers.clone().into_boxed_slice(),
        }
    }

    /// Builds and wraps the table for publication.
    pub fn publish(&mut self) -> Arc<CommandTable> {
        Arc::new(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_handler(_context: &mut ScriptExecutionContext) -> ScriptResult<CommandStatus> {
        Ok(CommandStatus::Suspend)
    }

    #[test]
    fn test_core_table_covers_core_opcodes() {
        let table = CommandTable::core();

        assert_eq!(table.name(), "core");
        assert_eq!(table.len(), OpCode::ALL.len());
        for opcode in OpCode::ALL {
            assert!(table.contains(opcode.into()), "No handler for {:?}", opcode);
        }
    }

    #[test]
    fn test_core_table_is_shared() {
        assert!(Arc::ptr_eq(&CommandTable::core(), &CommandTable::core()));
    }

    #[test]
    fn test_register_extends_bound() {
        let table = CommandTable::builder("sparse")
            .register(0x04, custom_handler)
            .build();

        assert_eq!(table.len(), 5);
        assert_eq!(table.last_opcode(), Some(0x04));
        assert_eq!(
            table.handler(0x04).unwrap() as usize,
            custom_handler as usize
        );
        assert_eq!(
            table.handler(0x02).unwrap_err(),
            Corruption::UnassignedOpcode { opcode: 0x02 }
        );
        assert_eq!(
            table.handler(0x05).unwrap_err(),
            Corruption::OpcodeOutOfRange {
                opcode: 0x05,
                table_len: 5
            }
        );
    }

    #[test]
    fn test_empty_table() {
        let table = CommandTable::builder("empty").build();
        assert!(table.is_empty());
        assert_eq!(table.last_opcode(), None);
        assert!(!table.contains(0));
    }

    #[test]
    fn test_derived_table_leaves_source_untouched() {
        let core = CommandTable::core();
        let derived = CommandTableBuilder::from_table("derived", &core)
            .set(OpCode::Nop, custom_handler)
            .unregister(OpCode::Wait.into())
            .build();

        assert_eq!(derived.len(), core.len());
        assert_eq!(
            derived.handler(OpCode::Nop.into()).unwrap() as usize,
            custom_handler as usize
        );
        assert!(!derived.contains(OpCode::Wait.into()));
        assert!(core.contains(OpCode::Wait.into()));
        assert_ne!(
            core.handler(OpCode::Nop.into()).unwrap() as usize,
            custom_handler as usize
        );
    }
}
