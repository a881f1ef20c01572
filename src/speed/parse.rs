//! Parser for speed expressions and range directives.

use std::str::FromStr;

use super::{Speed, SpeedDirective, SpeedPlan};
use crate::util::{Error, Result};

impl FromStr for Speed {
    type Err = Error;

    /// `"<factor>x"` or `"<seconds>"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(factor) = s.strip_suffix(['x', 'X']) {
            let factor = parse_number(factor, s)?;
            if factor <= 0.0 {
                return Err(Error::directive(format!("speed factor must be positive: {:?}", s)));
            }
            Ok(Speed::Factor(factor))
        } else {
            let secs = parse_number(s, s)?;
            if secs < 0.0 {
                return Err(Error::directive(format!("delay must not be negative: {:?}", s)));
            }
            Ok(Speed::Absolute(secs))
        }
    }
}

impl FromStr for SpeedDirective {
    type Err = Error;

    /// `"<low>[-<high>]:<speed>"`.
    fn from_str(s: &str) -> Result<Self> {
        let (range, speed) = s
            .split_once(':')
            .ok_or_else(|| Error::directive(format!("missing ':' in {:?}", s)))?;

        let (low, high) = match range.split_once('-') {
            Some((low, high)) => (parse_frame(low, s)?, parse_frame(high, s)?),
            None => {
                let frame = parse_frame(range, s)?;
                (frame, frame)
            }
        };
        if low > high {
            return Err(Error::directive(format!("range {}-{} is reversed in {:?}", low, high, s)));
        }

        Ok(SpeedDirective::new(low, high, speed.parse()?))
    }
}

/// Parse a comma-separated directive list. Empty entries are skipped.
pub fn parse_directives(s: &str) -> Result<Vec<SpeedDirective>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse::<SpeedDirective>)
        .collect()
}

/// Build a plan from the global speed token and an optional directive list.
pub fn parse_plan(speed: &str, ranges: Option<&str>) -> Result<SpeedPlan> {
    let default = speed.parse()?;
    let directives = match ranges {
        Some(ranges) => parse_directives(ranges)?,
        None => Vec::new(),
    };
    Ok(SpeedPlan::with_directives(default, directives))
}

fn parse_number(text: &str, whole: &str) -> Result<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| Error::directive(format!("invalid number in {:?}", whole)))?;
    if !value.is_finite() {
        return Err(Error::directive(format!("number must be finite in {:?}", whole)));
    }
    Ok(value)
}

fn parse_frame(text: &str, whole: &str) -> Result<u32> {
    let frame: u32 = text
        .trim()
        .parse()
        .map_err(|_| Error::directive(format!("invalid frame index in {:?}", whole)))?;
    if frame == 0 {
        return Err(Error::directive(format!("frames are numbered from 1 in {:?}", whole)));
    }
    Ok(frame)
}
