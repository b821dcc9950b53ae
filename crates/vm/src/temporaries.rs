//! Script temporary variables.
//!
//! Temporaries are the `u16` slots scripts use to pass arguments to and
//! results from special commands. Unlike the per-context variable banks they
//! belong to the host: the primary and level contexts see the same set.

use crate::error::{ScriptError, ScriptResult};
use std::cell::RefCell;
use std::rc::Rc;

/// Ids of the addressable temporaries, in storage order.
pub const TEMP_VARS: [u16; 5] = [0x8000, 0x8001, 0x8002, 0x8003, 0x800D];

/// Temporary that receives the result of special commands.
pub const RESULT_VAR: u16 = 0x800D;

/// A set of temporaries shared between contexts.
pub type SharedTemporaries = Rc<RefCell<TemporaryVars>>;

/// Values of the temporaries in [`TEMP_VARS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporaryVars {
    values: [u16; TEMP_VARS.len()],
}

impl TemporaryVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh set for sharing.
    pub fn shared() -> SharedTemporaries {
        Rc::new(RefCell::new(Self::new()))
    }

    fn slot(id: u16) -> ScriptResult<usize> {
        TEMP_VARS
            .iter()
            .position(|&var| var == id)
            .ok_or(ScriptError::InvalidTemporary(id))
    }

    pub fn get(&self, id: u16) -> ScriptResult<u16> {
        Ok(self.values[Self::slot(id)?])
    }

    pub fn set(&mut self, id: u16, value: u16) -> ScriptResult<()> {
        self.values[Self::slot(id)?] = value;
        Ok(())
    }

    /// Zeroes every temporary.
    pub fn clear(&mut self) {
        self.values = [0; TEMP_VARS.len()];
    }

    /// `(id, value)` pairs in [`TEMP_VARS`] order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        TEMP_VARS.iter().copied().zip(self.values.iter().copied())
    }
}
