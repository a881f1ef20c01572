//! Frame rewriter: one graphic control extension plus its image data.

use std::fmt;
use std::io::{Read, Write};

use super::format::FRAME_TAIL_SIZE;
use super::stream::GifStream;
use crate::speed::Speed;
use crate::util::Result;

/// Frame display time in hundredths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameDelay(u16);

impl FrameDelay {
    #[inline]
    pub const fn from_hundredths(hundredths: u16) -> Self {
        Self(hundredths)
    }

    #[inline]
    pub const fn hundredths(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for FrameDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}s", self.0 / 100, self.0 % 100)
    }
}

/// Delay rewrite recorded for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameChange {
    /// 1-based frame index.
    pub index: u32,
    pub original: FrameDelay,
    pub replacement: FrameDelay,
}

/// Rewrite the frame whose `21 F9` marker was just consumed.
///
/// Layout after the marker: block size, packed flags, delay (2 bytes LE),
/// then [`FRAME_TAIL_SIZE`] bytes up to the LZW minimum code size, then the
/// image data sub-blocks. Only the delay differs in the output.
pub fn rewrite_frame<R: Read, W: Write>(
    stream: &mut GifStream<R, W>,
    index: u32,
    speed: Speed,
) -> Result<FrameChange> {
    let _block_size = stream.read_u8_echo()?;
    let _packed = stream.read_u8_echo()?;

    let original = FrameDelay::from_hundredths(stream.read_u16_le()?);
    let replacement = speed.apply(original);
    stream.write_u16_le(replacement.hundredths())?;

    stream.read_exact_echo(FRAME_TAIL_SIZE)?;
    let blocks = stream.read_subblocks()?;

    tracing::trace!(
        frame = index,
        %speed,
        blocks,
        "delay {} -> {}",
        original,
        replacement
    );

    Ok(FrameChange { index, original, replacement })
}
