//! Script buffers and cursors.
//!
//! A [`Script`] is an immutable, cheaply clonable byte stream. A [`ScriptCursor`]
//! pairs a script with a byte offset and is what contexts keep as their
//! instruction pointer and on their call stack.

use crate::error::{Corruption, ScriptError, ScriptResult};
use std::fmt;
use std::sync::Arc;

/// Immutable byte-coded program.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script {
    bytes: Arc<[u8]>,
}

impl Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `true` when both handles point at the same buffer.
    pub fn same_buffer(&self, other: &Script) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Cursor at the first byte.
    pub fn start(&self) -> ScriptCursor {
        ScriptCursor {
            script: self.clone(),
            offset: 0,
        }
    }

    /// Cursor at `offset`; the end position (`offset == len`) is valid.
    pub fn cursor_at(&self, offset: usize) -> ScriptResult<ScriptCursor> {
        if offset > self.len() {
            return Err(ScriptError::corrupt(
                offset,
                Corruption::TargetOutOfBounds {
                    target: offset,
                    len: self.len(),
                },
            ));
        }
        Ok(ScriptCursor {
            script: self.clone(),
            offset,
        })
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script::new(bytes)
    }
}

impl From<&[u8]> for Script {
    fn from(bytes: &[u8]) -> Self {
        Script::new(bytes.to_vec())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script").field("len", &self.len()).finish()
    }
}

/// Read position inside a [`Script`].
///
/// Two cursors compare equal when they share the same buffer and offset.
#[derive(Clone)]
pub struct ScriptCursor {
    script: Script,
    offset: usize,
}

impl ScriptCursor {
    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.script.len()
    }

    pub fn remaining(&self) -> usize {
        self.script.len().saturating_sub(self.offset)
    }

    /// Cursor into the same script at `offset`.
    pub fn with_offset(&self, offset: usize) -> ScriptResult<ScriptCursor> {
        self.script.cursor_at(offset)
    }

    /// Reads `N` bytes and advances. The cursor is untouched on failure.
    pub fn read_array<const N: usize>(&mut self) -> ScriptResult<[u8; N]> {
        let available = self.remaining();
        if available < N {
            return Err(ScriptError::corrupt(
                self.offset,
                Corruption::TruncatedOperand {
                    wanted: N,
                    available,
                },
            ));
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.script.as_bytes()[self.offset..self.offset + N]);
        self.offset += N;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> ScriptResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> ScriptResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> ScriptResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }
}

impl PartialEq for ScriptCursor {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.script.same_buffer(&other.script)
    }
}

impl Eq for ScriptCursor {}

impl fmt::Debug for ScriptCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptCursor({:#x}/{:#x})", self.offset, self.script.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_reads() {
        let script = Script::new(vec![0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
        let mut cursor = script.start();

        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_truncated_read_leaves_cursor() {
        let script = Script::new(vec![0xaa, 0xbb]);
        let mut cursor = script.cursor_at(1).unwrap();

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(
            err,
            ScriptError::corrupt(
                1,
                Corruption::TruncatedOperand {
                    wanted: 4,
                    available: 1
                }
            )
        );
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_cursor_bounds() {
        let script = Script::new(vec![0; 3]);
        assert!(script.cursor_at(3).unwrap().is_at_end());
        assert!(script.cursor_at(4).is_err());
    }

    #[test]
    fn test_cursor_identity() {
        let a = Script::new(vec![1, 2, 3]);
        let b = Script::new(vec![1, 2, 3]);

        assert_eq!(a.start(), a.clone().start());
        assert_ne!(a.start(), b.start());
        assert_ne!(a.start(), a.cursor_at(1).unwrap());
    }
}
