pub mod class;

use std::fmt;

pub use class::DigitClass;

/// One position (or trailing wildcard) of a `_`-prefixed pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// A literal digit.
    Digit(u8),
    /// A digit class: `X`, `Z`, `N` or `[...]`.
    Class(DigitClass),
    /// `.`: one or more further characters.
    OneOrMore,
    /// `!`: zero or more further characters.
    ZeroOrMore,
}

impl Element {
    /// The digits accepted at this position, or `None` for a trailing wildcard.
    pub fn class(&self) -> Option<DigitClass> {
        match self {
            Element::Digit(d) => Some(DigitClass::single(*d)),
            Element::Class(class) => Some(*class),
            Element::OneOrMore | Element::ZeroOrMore => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Digit(d) => write!(f, "{}", d),
            Element::Class(class) => write!(f, "{}", class),
            Element::OneOrMore => f.write_str("."),
            Element::ZeroOrMore => f.write_str("!"),
        }
    }
}

/// A dialplan extension pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// An exact extension, matched literally (no leading `_`).
    Literal(String),
    /// A `_`-prefixed pattern.
    Match(Vec<Element>),
}

impl Pattern {
    pub fn is_literal(&self) -> bool {
        matches!(self, Pattern::Literal(_))
    }

    /// Number of characters every match has, or `None` if the pattern ends in `.` or `!`.
    pub fn fixed_len(&self) -> Option<usize> {
        match self {
            Pattern::Literal(digits) => Some(digits.len()),
            Pattern::Match(elements) => {
                if elements.iter().all(|e| e.class().is_some()) {
                    Some(elements.len())
                } else {
                    None
                }
            }
        }
    }

    /// How many distinct extensions the pattern matches. `None` when unbounded
    /// or when the count does not fit in a `u64`.
    pub fn count(&self) -> Option<u64> {
        match self {
            Pattern::Literal(_) => Some(1),
            Pattern::Match(elements) => elements.iter().try_fold(1u64, |acc, element| {
                element
                    .class()
                    .and_then(|class| acc.checked_mul(u64::from(class.width())))
            }),
        }
    }

    /// Whether the dialed string matches this pattern.
    pub fn matches(&self, dialed: &str) -> bool {
        match self {
            Pattern::Literal(digits) => digits == dialed,
            Pattern::Match(elements) => {
                let bytes = dialed.as_bytes();
                let mut pos = 0;
                for element in elements {
                    match element {
                        Element::OneOrMore => return pos < bytes.len(),
                        Element::ZeroOrMore => return true,
                        Element::Digit(_) | Element::Class(_) => {
                            let Some(&b) = bytes.get(pos) else {
                                return false;
                            };
                            if !b.is_ascii_digit() {
                                return false;
                            }
                            let accepted = element
                                .class()
                                .is_some_and(|class| class.contains(b - b'0'));
                            if !accepted {
                                return false;
                            }
                            pos += 1;
                        }
                    }
                }
                pos == bytes.len()
            }
        }
    }

    /// Whether the number, written without leading zeros, matches this pattern.
    pub fn matches_number(&self, number: u64) -> bool {
        self.matches(&number.to_string())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(digits) => f.write_str(digits),
            Pattern::Match(elements) => {
                f.write_str("_")?;
                for element in elements {
                    write!(f, "{}", element)?;
                }
                Ok(())
            }
        }
    }
}
