//! Echo writer: the output side of the rewrite.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::util::Result;

/// Appends bytes to the output in read order and tracks the write position.
///
/// No buffering of its own; wrap files in a `BufWriter`.
pub struct EchoWriter<W> {
    writer: W,
    pos: u64,
}

impl<W: Write> EchoWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pos: 0 }
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    /// Write a u16 value (little-endian).
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.writer.write_u16::<LittleEndian>(value)?;
        self.pos += 2;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
