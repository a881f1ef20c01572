//! Read-and-echo primitives shared by every block parser.

use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian};

use super::echo::EchoWriter;
use super::source::ByteSource;
use crate::util::{Error, Result};

/// Paired input source and echo output.
///
/// Every byte read through the `*_echo` methods lands in the output in the
/// same order. [`GifStream::read_u16_le`] is the only read that bypasses the
/// echo; the caller writes a replacement in its place.
pub struct GifStream<R, W> {
    source: ByteSource<R>,
    out: EchoWriter<W>,
}

impl<R: Read, W: Write> GifStream<R, W> {
    pub fn new(source: ByteSource<R>, out: EchoWriter<W>) -> Self {
        Self { source, out }
    }

    /// Input offset of the next unread byte.
    #[inline]
    pub fn input_pos(&self) -> u64 {
        self.source.pos()
    }

    /// Bytes written so far.
    #[inline]
    pub fn output_pos(&self) -> u64 {
        self.out.pos()
    }

    /// Read up to `n` bytes and echo them. Short only at end of stream.
    pub fn read_echo(&mut self, n: usize) -> Result<Vec<u8>> {
        let data = self.source.read(n)?;
        self.out.write_bytes(&data)?;
        Ok(data)
    }

    /// Read and echo exactly `n` bytes; a short read is a truncated stream.
    pub fn read_exact_echo(&mut self, n: usize) -> Result<Vec<u8>> {
        let offset = self.source.pos();
        let data = self.read_echo(n)?;
        if data.len() < n {
            return Err(Error::TruncatedStream { offset, expected: n, actual: data.len() });
        }
        Ok(data)
    }

    /// Read and echo one length or flag byte.
    pub fn read_u8_echo(&mut self) -> Result<u8> {
        let data = self.read_exact_echo(1)?;
        Ok(data[0])
    }

    /// Read a little-endian u16 without echoing it.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let offset = self.source.pos();
        let data = self.source.read(2)?;
        if data.len() < 2 {
            // keep the output aligned with what was consumed
            self.out.write_bytes(&data)?;
            return Err(Error::TruncatedStream { offset, expected: 2, actual: data.len() });
        }
        Ok(LittleEndian::read_u16(&data))
    }

    /// Write replacement bytes for a field read with [`GifStream::read_u16_le`].
    pub fn write_u16_le(&mut self, value: u16) -> Result<()> {
        self.out.write_u16(value)
    }

    /// Drain a sub-block chain: length-prefixed runs up to a zero length.
    ///
    /// Returns the number of data sub-blocks copied.
    pub fn read_subblocks(&mut self) -> Result<usize> {
        let mut count = 0;
        loop {
            let len = self.read_u8_echo()? as usize;
            if len == 0 {
                return Ok(count);
            }
            self.read_exact_echo(len)?;
            count += 1;
        }
    }

    /// Echo bytes one at a time until `suffix` has just been consumed.
    ///
    /// On a mismatch the match counter drops straight back to zero and the
    /// current byte is not retried against the start of `suffix`, so a
    /// self-overlapping suffix can be missed. Returns `false` if the stream
    /// ended first; everything read has been echoed either way.
    pub fn skip_until(&mut self, suffix: &[u8]) -> Result<bool> {
        if suffix.is_empty() {
            return Ok(true);
        }
        let mut k = 0;
        while let Some(b) = self.source.read_byte()? {
            self.out.write_bytes(&[b])?;
            if b == suffix[k] {
                k += 1;
            } else {
                k = 0;
            }
            if k == suffix.len() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Echo everything left in the input.
    pub fn copy_rest(&mut self) -> Result<u64> {
        let mut copied = 0u64;
        loop {
            let data = self.read_echo(self.source.capacity())?;
            if data.is_empty() {
                return Ok(copied);
            }
            copied += data.len() as u64;
        }
    }

    /// Flush the output.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()
    }

    /// Unwrap the output writer.
    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(data: &[u8]) -> GifStream<&[u8], Vec<u8>> {
        GifStream::new(ByteSource::with_capacity(4, data), EchoWriter::new(Vec::new()))
    }

    #[test]
    fn test_read_exact_echo_truncated() {
        let mut s = stream(&[1, 2, 3]);
        assert_eq!(s.read_exact_echo(2).unwrap(), vec![1, 2]);
        let err = s.read_exact_echo(2).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream { offset: 2, expected: 2, actual: 1 }
        ));
        assert_eq!(s.into_writer(), vec![1, 2, 3]);
    }

    #[test]
    fn test_subblocks() {
        let data = [3, 0xA, 0xB, 0xC, 1, 0xD, 0, 0x3B];
        let mut s = stream(&data);
        assert_eq!(s.read_subblocks().unwrap(), 2);
        assert_eq!(s.input_pos(), 7);
        assert_eq!(s.into_writer(), &data[..7]);
    }

    #[test]
    fn test_subblocks_truncated() {
        let mut s = stream(&[5, 1, 2]);
        assert!(matches!(s.read_subblocks(), Err(Error::TruncatedStream { .. })));
        let mut s = stream(&[2, 1, 2]);
        assert!(matches!(s.read_subblocks(), Err(Error::TruncatedStream { .. })));
    }

    #[test]
    fn test_u16_replacement() {
        let mut s = stream(&[0x0A, 0x00, 0xFF]);
        assert_eq!(s.read_u16_le().unwrap(), 10);
        s.write_u16_le(5).unwrap();
        s.read_exact_echo(1).unwrap();
        assert_eq!(s.into_writer(), vec![0x05, 0x00, 0xFF]);
    }

    #[test]
    fn test_skip_until_finds_suffix() {
        let data = b"xxabcyy";
        let mut s = stream(data);
        assert!(s.skip_until(b"abc").unwrap());
        assert_eq!(s.input_pos(), 5);
        assert_eq!(s.into_writer(), b"xxabc");
    }

    #[test]
    fn test_skip_until_restarts_at_zero() {
        // "aab": the second 'a' resets the counter and is not reconsidered
        let mut s = stream(b"aab");
        assert!(!s.skip_until(b"ab").unwrap());
        assert_eq!(s.into_writer(), b"aab");

        let mut s = stream(b"aabab");
        assert!(s.skip_until(b"ab").unwrap());
        assert_eq!(s.input_pos(), 5);
    }

    #[test]
    fn test_skip_until_eof() {
        let mut s = stream(b"no end here");
        assert!(!s.skip_until(b"\x01\xFF").unwrap());
        assert_eq!(s.into_writer(), b"no end here");
    }

    #[test]
    fn test_copy_rest() {
        let data: Vec<u8> = (0..19).collect();
        let mut s = stream(&data);
        s.read_exact_echo(3).unwrap();
        assert_eq!(s.copy_rest().unwrap(), 16);
        assert_eq!(s.into_writer(), data);
    }
}
