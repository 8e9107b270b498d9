use std::num::IntErrorKind;
use std::str::FromStr;

use crate::error::RangeError;

/// An inclusive number range `[min, max]` to be turned into patterns.
/// `min > max` denotes the empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub min: u64,
    pub max: u64,
}

impl Interval {
    pub fn new(min: u64, max: u64) -> Self {
        Interval { min, max }
    }

    /// Parse both bounds from decimal text.
    pub fn parse(min: &str, max: &str) -> Result<Self, RangeError> {
        Ok(Interval {
            min: parse_bound(min)?,
            max: parse_bound(max)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Parse one line of a ranges file. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, RangeError> {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Interval {
    type Err = RangeError;

    /// Accepts `min max`, `min,max` or `min-max`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        match tokens.as_slice() {
            [min, max] => Interval::parse(min, max),
            [single] => {
                if single.starts_with('-') {
                    return Err(RangeError::Negative(single.to_string()));
                }
                match single.split_once('-') {
                    Some((min, max)) => Interval::parse(min, max),
                    None => Err(RangeError::MalformedRange(s.trim().to_string())),
                }
            }
            _ => Err(RangeError::MalformedRange(s.trim().to_string())),
        }
    }
}

/// Parse one non-negative decimal bound.
pub fn parse_bound(text: &str) -> Result<u64, RangeError> {
    let text = text.trim();
    match text.parse::<u64>() {
        Ok(n) => Ok(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            Err(RangeError::TooLarge(text.to_string()))
        }
        Err(_) => {
            let is_negative_integer = text
                .strip_prefix('-')
                .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
            if is_negative_integer {
                Err(RangeError::Negative(text.to_string()))
            } else {
                Err(RangeError::NotAnInteger(text.to_string()))
            }
        }
    }
}
