//! Streaming GIF walker.
//!
//! Copies a GIF byte stream to an output while rewriting each graphic control
//! extension's delay field. No document model is built: blocks are located
//! from their markers and length prefixes and copied as they are read.
//!
//! ## Supported layout
//!
//! ```text
//! +----------------------------+
//! | "GIF89a"                   |  6 bytes
//! | Width, height              |  2 + 2 bytes (u16 LE)
//! | Flags, bg, aspect, GCT     |  771 bytes
//! +----------------------------+
//! | 21 FF  NETSCAPE2.0 loop    |  required
//! | 21 FF  XMP DataXMP ...     |  optional, ends with the magic trailer
//! +----------------------------+
//! | 21 F9  GCE (delay)         |  per frame
//! | 2C     image descriptor    |
//! |        LZW sub-blocks      |
//! +----------------------------+
//! | 3B                         |  trailer
//! +----------------------------+
//! ```

mod echo;
mod format;
mod frame;
mod source;
mod stream;
mod walker;

pub use echo::*;
pub use format::*;
pub use frame::*;
pub use source::*;
pub use stream::*;
pub use walker::*;
