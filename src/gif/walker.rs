//! Structural walker: header, extensions, frame loop, trailer.
//!
//! The walk is strictly forward. Each state reads what it needs, echoes it,
//! and hands the next marker to the following state:
//!
//! ```text
//! Header -> Netscape -> [XMP] -> Frame* -> Trailer
//! ```

use std::io::{Read, Write};

use super::format::*;
use super::frame::{rewrite_frame, FrameChange};
use super::source::ByteSource;
use super::echo::EchoWriter;
use super::stream::GifStream;
use crate::speed::SpeedPlan;
use crate::util::{Error, Result};

/// Outcome of a completed rewrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    /// Logical screen size.
    pub width: u16,
    pub height: u16,
    /// An XMP packet was present and skipped.
    pub xmp_skipped: bool,
    /// One entry per frame, in stream order.
    pub frames: Vec<FrameChange>,
    /// Bytes after the trailer, copied unchanged.
    pub trailing_bytes: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

impl ConversionReport {
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames whose delay actually changed.
    pub fn changed_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.original != f.replacement).count()
    }

    /// Total display time before and after, in hundredths.
    pub fn total_hundredths(&self) -> (u64, u64) {
        self.frames.iter().fold((0, 0), |(a, b), f| {
            (a + u64::from(f.original.hundredths()), b + u64::from(f.replacement.hundredths()))
        })
    }
}

/// Copy `input` to `output`, rewriting every frame delay per `plan`.
///
/// The output is flushed on success. On error it holds everything echoed up to
/// the fault and should be discarded.
pub fn rewrite_delays<R: Read, W: Write>(
    input: R,
    output: W,
    plan: &SpeedPlan,
) -> Result<ConversionReport> {
    let stream = GifStream::new(ByteSource::new(input), EchoWriter::new(output));
    let (report, _) = Walker::new(stream, plan).run()?;
    Ok(report)
}

/// Walker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Netscape,
    Xmp,
    Frames,
    Trailer,
    Done,
}

/// Drives a [`GifStream`] through the block sequence.
pub struct Walker<'a, R, W> {
    stream: GifStream<R, W>,
    plan: &'a SpeedPlan,
    state: State,
    /// Marker read by the previous state.
    marker: Vec<u8>,
    report: ConversionReport,
}

impl<'a, R: Read, W: Write> Walker<'a, R, W> {
    pub fn new(stream: GifStream<R, W>, plan: &'a SpeedPlan) -> Self {
        Self {
            stream,
            plan,
            state: State::Header,
            marker: Vec::new(),
            report: ConversionReport::default(),
        }
    }

    /// Walk to the trailer. Returns the report and the output writer.
    pub fn run(mut self) -> Result<(ConversionReport, W)> {
        while self.state != State::Done {
            self.state = match self.state {
                State::Header => self.header()?,
                State::Netscape => self.netscape()?,
                State::Xmp => self.xmp()?,
                State::Frames => self.frames()?,
                State::Trailer => self.trailer()?,
                State::Done => State::Done,
            };
        }
        self.stream.flush()?;
        self.report.bytes_read = self.stream.input_pos();
        self.report.bytes_written = self.stream.output_pos();
        Ok((self.report, self.stream.into_writer()))
    }

    fn header(&mut self) -> Result<State> {
        let header = self.stream.read_exact_echo(HEADER_SIZE)?;
        self.report.width = self.read_u16_echo()?;
        self.report.height = self.read_u16_echo()?;
        self.stream.read_exact_echo(SCREEN_REGION_SIZE)?;

        tracing::debug!(
            "header {:?}, {}x{}",
            String::from_utf8_lossy(&header),
            self.report.width,
            self.report.height
        );
        Ok(State::Netscape)
    }

    fn netscape(&mut self) -> Result<State> {
        self.next_marker()?;
        if Marker::classify(&self.marker) != Some(Marker::Application) {
            return Err(self.unexpected("21 ff"));
        }
        let len = self.stream.read_u8_echo()? as usize;
        let app_id = self.stream.read_exact_echo(len)?;
        self.stream.read_exact_echo(NETSCAPE_SUBBLOCK_HEADER_SIZE)?;
        self.stream.read_exact_echo(NETSCAPE_LOOP_COUNT_SIZE)?;
        self.stream.read_exact_echo(1)?;

        tracing::debug!("application extension {:?}", String::from_utf8_lossy(&app_id));
        self.next_marker()?;
        Ok(State::Xmp)
    }

    fn xmp(&mut self) -> Result<State> {
        if Marker::classify(&self.marker) != Some(Marker::Application) {
            return Ok(State::Frames);
        }
        let offset = self.stream.input_pos();
        let len = self.stream.read_u8_echo()? as usize;
        let app_id = self.stream.read_exact_echo(len)?;
        if app_id != XMP_IDENTIFIER {
            return Err(Error::UnknownApplicationIdentifier {
                offset,
                identifier: String::from_utf8_lossy(&app_id).into_owned(),
            });
        }

        let start = self.stream.input_pos();
        let found = self.stream.skip_until(&XMP_MAGIC_END)?;
        tracing::debug!(
            bytes = self.stream.input_pos() - start,
            found,
            "skipped XMP packet"
        );
        self.report.xmp_skipped = true;
        self.next_marker()?;
        Ok(State::Frames)
    }

    fn frames(&mut self) -> Result<State> {
        let mut index = 1u32;
        loop {
            match Marker::classify(&self.marker) {
                Some(Marker::GraphicControl) => {
                    let speed = self.plan.resolve(index);
                    let change = rewrite_frame(&mut self.stream, index, speed)?;
                    self.report.frames.push(change);
                    self.next_marker()?;
                    index += 1;
                }
                Some(Marker::Trailer) => return Ok(State::Trailer),
                _ if index == 1 => return Err(self.unexpected("21 f9")),
                _ => return Err(self.unexpected("21 f9 or 3b")),
            }
        }
    }

    fn trailer(&mut self) -> Result<State> {
        // The two-byte marker read may already have echoed one byte past 3B.
        let extra = (self.marker.len() - 1) as u64 + self.stream.copy_rest()?;
        if extra > 0 {
            tracing::debug!(bytes = extra, "copied data after trailer");
        }
        self.report.trailing_bytes = extra;
        tracing::debug!(frames = self.report.frames.len(), "reached trailer");
        Ok(State::Done)
    }

    /// Read and echo the next block marker (short at end of stream).
    fn next_marker(&mut self) -> Result<()> {
        self.marker = self.stream.read_echo(2)?;
        Ok(())
    }

    fn read_u16_echo(&mut self) -> Result<u16> {
        let data = self.stream.read_exact_echo(2)?;
        Ok(u16::from_le_bytes([data[0], data[1]]))
    }

    fn unexpected(&self, expected: &'static str) -> Error {
        Error::UnexpectedMarker {
            offset: self.stream.input_pos() - self.marker.len() as u64,
            expected,
            found: self.marker.clone(),
        }
    }
}
