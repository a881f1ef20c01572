//! Speed directives: how each frame's delay gets rewritten.
//!
//! A [`SpeedPlan`] holds a global [`Speed`] and an ordered list of
//! [`SpeedDirective`]s that override it for inclusive frame ranges. Frames are
//! numbered from 1. Resolution is a pure function of the plan and the frame
//! index; it never touches the byte stream.
//!
//! ## Syntax
//!
//! ```text
//! speed     := factor "x" | seconds
//! directive := low ["-" high] ":" speed
//! ranges    := directive ("," directive)*
//! ```
//!
//! `2x` halves every delay, `0.5x` doubles it, `0.04` sets it to 40ms.

mod parse;

pub use parse::*;

use std::fmt;

use crate::gif::FrameDelay;

/// Delay transform applied to a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Speed {
    /// Divide the stored delay by this factor.
    Factor(f64),
    /// Replace the stored delay with this many seconds.
    ///
    /// Rounded to the nearest hundredth, not truncated: `0.29` gives 29.
    Absolute(f64),
}

impl Speed {
    /// Identity transform.
    pub const UNCHANGED: Speed = Speed::Factor(1.0);

    /// Compute the replacement delay.
    ///
    /// Factors work on the raw hundredths and truncate. Absolute seconds are
    /// rounded to the nearest hundredth. Both saturate at `u16::MAX`.
    pub fn apply(&self, original: FrameDelay) -> FrameDelay {
        let hundredths = match *self {
            Speed::Factor(factor) => (f64::from(original.hundredths()) / factor).floor(),
            Speed::Absolute(secs) => (secs * 100.0).round(),
        };
        // float-to-int `as` saturates and maps NaN to 0
        FrameDelay::from_hundredths(hundredths as u16)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speed::Factor(factor) => write!(f, "{}x", factor),
            Speed::Absolute(secs) => write!(f, "{}", secs),
        }
    }
}

/// Override for an inclusive frame range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedDirective {
    pub low: u32,
    pub high: u32,
    pub speed: Speed,
}

impl SpeedDirective {
    pub fn new(low: u32, high: u32, speed: Speed) -> Self {
        Self { low, high, speed }
    }

    /// Directive for a single frame.
    pub fn single(frame: u32, speed: Speed) -> Self {
        Self::new(frame, frame, speed)
    }

    #[inline]
    pub fn contains(&self, frame: u32) -> bool {
        self.low <= frame && frame <= self.high
    }
}

/// Global speed plus ordered range overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedPlan {
    default: Speed,
    directives: Vec<SpeedDirective>,
}

impl SpeedPlan {
    /// Plan applying `default` to every frame.
    pub fn new(default: Speed) -> Self {
        Self { default, directives: Vec::new() }
    }

    pub fn with_directives(default: Speed, directives: Vec<SpeedDirective>) -> Self {
        Self { default, directives }
    }

    /// Append an override. Earlier overrides win on overlap.
    pub fn push(&mut self, directive: SpeedDirective) {
        self.directives.push(directive);
    }

    pub fn default_speed(&self) -> Speed {
        self.default
    }

    pub fn directives(&self) -> &[SpeedDirective] {
        &self.directives
    }

    /// Speed for a 1-based frame index: first matching override, else default.
    pub fn resolve(&self, frame: u32) -> Speed {
        self.directives
            .iter()
            .find(|d| d.contains(frame))
            .map(|d| d.speed)
            .unwrap_or(self.default)
    }
}

impl Default for SpeedPlan {
    fn default() -> Self {
        Self::new(Speed::UNCHANGED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delay(h: u16) -> FrameDelay {
        FrameDelay::from_hundredths(h)
    }

    #[test]
    fn test_factor() {
        assert_eq!(Speed::Factor(2.0).apply(delay(10)), delay(5));
        assert_eq!(Speed::Factor(2.0).apply(delay(7)), delay(3));
        assert_eq!(Speed::Factor(0.5).apply(delay(7)), delay(14));
        assert_eq!(Speed::Factor(3.0).apply(delay(10)), delay(3));
        assert_eq!(Speed::UNCHANGED.apply(delay(0xFFFF)), delay(0xFFFF));
    }

    #[test]
    fn test_factor_saturates() {
        assert_eq!(Speed::Factor(0.25).apply(delay(30_000)), delay(u16::MAX));
    }

    #[test]
    fn test_absolute() {
        assert_eq!(Speed::Absolute(0.04).apply(delay(10)), delay(4));
        assert_eq!(Speed::Absolute(0.29).apply(delay(0)), delay(29));
        assert_eq!(Speed::Absolute(0.0).apply(delay(10)), delay(0));
        assert_eq!(Speed::Absolute(1e9).apply(delay(10)), delay(u16::MAX));
    }

    #[test]
    fn test_resolve_ranges() {
        let plan = SpeedPlan::with_directives(
            Speed::UNCHANGED,
            vec![
                SpeedDirective::new(1, 3, Speed::Factor(2.0)),
                SpeedDirective::new(4, 6, Speed::Factor(0.5)),
            ],
        );
        assert_eq!(plan.resolve(2), Speed::Factor(2.0));
        assert_eq!(plan.resolve(3), Speed::Factor(2.0));
        assert_eq!(plan.resolve(5), Speed::Factor(0.5));
        assert_eq!(plan.resolve(7), Speed::UNCHANGED);
    }

    #[test]
    fn test_first_match_wins() {
        let mut plan = SpeedPlan::new(Speed::Factor(1.5));
        plan.push(SpeedDirective::new(2, 10, Speed::Absolute(0.1)));
        plan.push(SpeedDirective::single(5, Speed::Factor(4.0)));
        assert_eq!(plan.resolve(5), Speed::Absolute(0.1));
        assert_eq!(plan.resolve(1), Speed::Factor(1.5));
        assert_eq!(plan.resolve(11), Speed::Factor(1.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Speed::Factor(2.0).to_string(), "2x");
        assert_eq!(Speed::Factor(0.5).to_string(), "0.5x");
        assert_eq!(Speed::Absolute(0.04).to_string(), "0.04");
    }
}
