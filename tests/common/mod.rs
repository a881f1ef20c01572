//! Synthetic GIF fixtures.

#![allow(dead_code)]

use gif_speed::gif::{XMP_IDENTIFIER, XMP_MAGIC_END};

/// One frame: stored delay and its image data sub-blocks.
#[derive(Debug, Clone)]
pub struct Frame {
    pub delay: u16,
    pub data: Vec<Vec<u8>>,
}

impl Frame {
    /// Frame whose data deliberately contains marker-like bytes.
    pub fn new(delay: u16) -> Self {
        Self {
            delay,
            data: vec![vec![0x21, 0xF9, 0x04, 0x3B], vec![0x21, 0xFF, 0x00]],
        }
    }

    /// Frame with `len` bytes of image data split into 255-byte sub-blocks.
    pub fn large(delay: u16, len: usize) -> Self {
        let bytes: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
        Self {
            delay,
            data: bytes.chunks(255).map(|c| c.to_vec()).collect(),
        }
    }
}

/// Builder for GIFs in the layout the walker supports.
#[derive(Debug, Clone)]
pub struct GifBuilder {
    pub netscape: bool,
    pub xmp: Option<(Vec<u8>, Vec<u8>)>,
    pub frames: Vec<Frame>,
    pub trailing: Vec<u8>,
}

impl GifBuilder {
    pub fn new() -> Self {
        Self {
            netscape: true,
            xmp: None,
            frames: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn delays(delays: &[u16]) -> Self {
        Self::new().with_frames(delays.iter().map(|&d| Frame::new(d)).collect())
    }

    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_xmp(mut self, payload: &[u8]) -> Self {
        self.xmp = Some((XMP_IDENTIFIER.to_vec(), payload.to_vec()));
        self
    }

    pub fn with_app(mut self, identifier: &[u8], payload: &[u8]) -> Self {
        self.xmp = Some((identifier.to_vec(), payload.to_vec()));
        self
    }

    pub fn without_netscape(mut self) -> Self {
        self.netscape = false;
        self
    }

    pub fn with_trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing = bytes.to_vec();
        self
    }

    /// Same GIF with every delay replaced.
    pub fn map_delays(&self, f: impl Fn(u32, u16) -> u16) -> Self {
        let mut out = self.clone();
        for (i, frame) in out.frames.iter_mut().enumerate() {
            frame.delay = f(i as u32 + 1, frame.delay);
        }
        out
    }

    pub fn build(&self) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(b"GIF89a");
        v.extend_from_slice(&40u16.to_le_bytes());
        v.extend_from_slice(&30u16.to_le_bytes());
        // packed (GCT, 256 entries), background, aspect
        v.extend_from_slice(&[0xF7, 0x00, 0x00]);
        v.extend((0..768).map(|i| (i % 256) as u8));

        if self.netscape {
            v.extend_from_slice(&[0x21, 0xFF, 0x0B]);
            v.extend_from_slice(b"NETSCAPE2.0");
            v.extend_from_slice(&[0x03, 0x01, 0x00, 0x00, 0x00]);
        }

        if let Some((id, payload)) = &self.xmp {
            v.extend_from_slice(&[0x21, 0xFF, id.len() as u8]);
            v.extend_from_slice(id);
            v.extend_from_slice(payload);
            v.extend_from_slice(&XMP_MAGIC_END);
        }

        for frame in &self.frames {
            v.extend_from_slice(&[0x21, 0xF9, 0x04, 0x09]);
            v.extend_from_slice(&frame.delay.to_le_bytes());
            v.extend_from_slice(&[0x00, 0x00]);
            // image descriptor: 40x30 at origin, no local color table
            v.extend_from_slice(&[0x2C, 0, 0, 0, 0, 40, 0, 30, 0, 0x00]);
            v.push(0x08);
            for block in &frame.data {
                v.push(block.len() as u8);
                v.extend_from_slice(block);
            }
            v.push(0x00);
        }

        v.push(0x3B);
        v.extend_from_slice(&self.trailing);
        v
    }
}

pub const XMP_PACKET: &[u8] = b"<?xpacket begin='' id='W5M0MpCehiHzreSzNTczkc9d'?>\
<x:xmpmeta xmlns:x='adobe:ns:meta/'><rdf:RDF/></x:xmpmeta><?xpacket end='w'?>";
