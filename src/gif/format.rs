//! GIF block markers and fixed field sizes.
//!
//! Only the subset of the GIF89a layout needed to reach each frame's delay
//! field is described here. Everything else is opaque, length-delimited
//! payload that passes through untouched.

/// Size of the signature + version header (`GIF89a`).
pub const HEADER_SIZE: usize = 6;

/// Packed fields, background color index, pixel aspect ratio and the
/// 256-entry global color table.
pub const SCREEN_REGION_SIZE: usize = 3 + 256 * 3;

/// Application extension introducer.
pub const APP_EXT_MARKER: [u8; 2] = [0x21, 0xFF];

/// Graphic control extension introducer.
pub const GFX_CTRL_EXT_MARKER: [u8; 2] = [0x21, 0xF9];

/// Trailer byte ending the data stream.
pub const TRAILER: u8 = 0x3B;

/// Netscape looping sub-block: size byte + sub-block index.
pub const NETSCAPE_SUBBLOCK_HEADER_SIZE: usize = 2;

/// Netscape loop count (0 = forever).
pub const NETSCAPE_LOOP_COUNT_SIZE: usize = 2;

/// Application identifier + authentication code of an XMP packet.
pub const XMP_IDENTIFIER: &[u8] = b"XMP DataXMP";

/// Length of the XMP magic trailer.
pub const XMP_MAGIC_END_LEN: usize = 258;

/// Magic trailer closing an embedded XMP packet.
///
/// `0x01`, then a descending ramp `0xFF..=0x00`, then the `0x00` block
/// terminator. It lets GIF readers that ignore XMP walk the packet as
/// sub-blocks.
pub const XMP_MAGIC_END: [u8; XMP_MAGIC_END_LEN] = xmp_magic_end();

const fn xmp_magic_end() -> [u8; XMP_MAGIC_END_LEN] {
    let mut out = [0u8; XMP_MAGIC_END_LEN];
    out[0] = 0x01;
    let mut i = 0;
    while i < 256 {
        out[1 + i] = (0xFF - i) as u8;
        i += 1;
    }
    // out[257] stays 0x00
    out
}

/// Stored delay: low byte, high byte.
pub const DELAY_SIZE: usize = 2;

/// Bytes between the delay field and the first image data sub-block:
/// transparent index, extension terminator, the 10-byte image descriptor and
/// the LZW minimum code size.
pub const FRAME_TAIL_SIZE: usize = 1 + 1 + 10 + 1;

/// A block marker as read from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `21 FF`
    Application,
    /// `21 F9`
    GraphicControl,
    /// `3B`
    Trailer,
}

impl Marker {
    /// Classify up to two marker bytes. A trailer needs only its first byte.
    pub fn classify(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x21, 0xFF] => Some(Marker::Application),
            [0x21, 0xF9] => Some(Marker::GraphicControl),
            [TRAILER, ..] => Some(Marker::Trailer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(SCREEN_REGION_SIZE, 771);
        assert_eq!(FRAME_TAIL_SIZE, 13);
        assert_eq!(XMP_IDENTIFIER.len(), 11);
    }

    #[test]
    fn test_xmp_magic_end() {
        assert_eq!(&XMP_MAGIC_END[..4], &[0x01, 0xFF, 0xFE, 0xFD]);
        assert_eq!(&XMP_MAGIC_END[254..], &[0x02, 0x01, 0x00, 0x00]);
        // 0x00 appears twice: end of the ramp and the block terminator
        assert_eq!(XMP_MAGIC_END.iter().filter(|&&b| b == 0).count(), 2);
    }

    #[test]
    fn test_classify() {
        assert_eq!(Marker::classify(&[0x21, 0xFF]), Some(Marker::Application));
        assert_eq!(Marker::classify(&[0x21, 0xF9]), Some(Marker::GraphicControl));
        assert_eq!(Marker::classify(&[0x3B]), Some(Marker::Trailer));
        assert_eq!(Marker::classify(&[0x3B, 0x00]), Some(Marker::Trailer));
        assert_eq!(Marker::classify(&[0x21, 0xFE]), None);
        assert_eq!(Marker::classify(&[0x21]), None);
        assert_eq!(Marker::classify(&[]), None);
    }
}
