//! Buffered byte source with a fixed-size refill block.

use std::io::{ErrorKind, Read};

use crate::util::Result;

/// Refill block size.
pub const BLOCK_SIZE: usize = 4096;

/// Forward-only reader serving exact-length slices across refills.
///
/// End of stream is not an error here: a read that hits it returns whatever
/// was collected, possibly nothing. Callers decide whether a short read is
/// fatal.
pub struct ByteSource<R> {
    inner: R,
    buf: Box<[u8]>,
    /// Valid bytes in `buf`.
    filled: usize,
    /// Next unread byte in `buf`. Always `<= filled`.
    cursor: usize,
    /// Bytes handed out so far.
    pos: u64,
    eof: bool,
}

impl<R: Read> ByteSource<R> {
    /// Wrap a reader with the default block size.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(BLOCK_SIZE, inner)
    }

    /// Wrap a reader with a custom block size (at least one byte).
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            filled: 0,
            cursor: 0,
            pos: 0,
            eof: false,
        }
    }

    /// Offset of the next byte to be read.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Read up to `n` bytes. Returns fewer only at end of stream.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n.min(self.buf.len()));
        while out.len() < n {
            if self.cursor == self.filled && !self.refill()? {
                break;
            }
            let take = (n - out.len()).min(self.filled - self.cursor);
            out.extend_from_slice(&self.buf[self.cursor..self.cursor + take]);
            self.cursor += take;
        }
        self.pos += out.len() as u64;
        Ok(out)
    }

    /// Read a single byte, `None` at end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.cursor == self.filled && !self.refill()? {
            return Ok(None);
        }
        let b = self.buf[self.cursor];
        self.cursor += 1;
        self.pos += 1;
        Ok(Some(b))
    }

    /// Refill the whole block. Returns `false` once the stream is exhausted.
    fn refill(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }
        let n = loop {
            match self.inner.read(&mut self.buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        self.cursor = 0;
        self.filled = n;
        if n == 0 {
            self.eof = true;
        }
        Ok(n > 0)
    }
}
