use thiserror::Error;

/// Input validation failures for a number range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("negative numbers are not supported: {0}")]
    Negative(String),
    #[error("not a non-negative integer: {0:?}")]
    NotAnInteger(String),
    #[error("number too large: {0}")]
    TooLarge(String),
    #[error("malformed range {0:?}: expected `<min> <max>` or `<min>-<max>`")]
    MalformedRange(String),
    #[error("{value} exceeds the {digits}-digit ceiling")]
    AboveCeiling { value: u64, digits: u32 },
    #[error("ceiling must be between {min} and {max} digits, got {got}")]
    InvalidCeiling { got: u32, min: u32, max: u32 },
}

/// Failures turning a pattern back into number ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("pattern has a trailing '.' or '!' and matches unboundedly many extensions")]
    Unbounded,
    #[error("pattern matches numbers written with leading zeros")]
    LeadingZero,
    #[error("pattern is {digits} digits long; at most {max} are supported")]
    TooLong { digits: usize, max: usize },
    #[error("pattern expands to more than {limit} ranges")]
    TooManyRanges { limit: usize },
}
