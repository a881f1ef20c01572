//! # gif-speed
//!
//! Change the playback speed of animated GIFs by rewriting each frame's delay
//! field in a single streaming pass. Every other byte is copied unchanged; no
//! pixel data is decoded.
//!
//! ## Modules
//!
//! - [`util`] - Errors
//! - [`gif`] - Buffered source, echo writer and the structural walker
//! - [`speed`] - Speed expressions, range directives and their resolution
//! - [`convert`] - File-level conversion with atomic output
//!
//! ## Example
//!
//! ```ignore
//! use gif_speed::prelude::*;
//!
//! let plan = parse_plan("2x", Some("1-3:0.5x"))?;
//! let report = convert_file("anim.gif", "anim-speed.gif", &plan)?;
//! println!("{} frames", report.frame_count());
//! ```

pub mod util;
pub mod gif;
pub mod speed;
pub mod convert;

// Re-export commonly used types
pub use util::{Error, Result};
pub use gif::{rewrite_delays, ConversionReport, FrameChange, FrameDelay};
pub use speed::{Speed, SpeedDirective, SpeedPlan};
pub use convert::{convert_file, default_output_path, rewrite_bytes};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::gif::{rewrite_delays, ConversionReport, FrameChange, FrameDelay};
    pub use crate::speed::{parse_directives, parse_plan, Speed, SpeedDirective, SpeedPlan};
    pub use crate::convert::{convert_file, default_output_path, rewrite_bytes};
}
