use std::fmt;

/// A set of decimal digits accepted at one pattern position.
///
/// Stored as a 10-bit mask, bit `d` set when digit `d` is accepted. The
/// canonical text form prefers the single-letter tokens: `X` (0-9), `Z` (1-9)
/// and `N` (2-9); everything else is written as a bracket class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitClass {
    mask: u16,
}

const FULL_MASK: u16 = 0b11_1111_1111;

impl DigitClass {
    /// `X`: any digit.
    pub const ANY: DigitClass = DigitClass { mask: FULL_MASK };
    /// `Z`: any digit except 0.
    pub const NON_ZERO: DigitClass = DigitClass { mask: FULL_MASK & !0b1 };
    /// `N`: any digit from 2 to 9.
    pub const TWO_TO_NINE: DigitClass = DigitClass { mask: FULL_MASK & !0b11 };

    pub const fn empty() -> Self {
        DigitClass { mask: 0 }
    }

    /// Class accepting `lo..=hi`. `hi` is clamped to 9; an inverted range is empty.
    pub fn span(lo: u8, hi: u8) -> Self {
        let hi = hi.min(9);
        let mut class = DigitClass::empty();
        for digit in lo..=hi {
            class.insert(digit);
        }
        class
    }

    pub fn single(digit: u8) -> Self {
        DigitClass::span(digit, digit)
    }

    pub fn insert(&mut self, digit: u8) {
        if digit <= 9 {
            self.mask |= 1 << digit;
        }
    }

    pub fn contains(&self, digit: u8) -> bool {
        digit <= 9 && self.mask & (1 << digit) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Number of accepted digits.
    pub fn width(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Accepted digits, ascending.
    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=9).filter(|d| self.contains(*d))
    }

    /// Maximal runs of consecutive accepted digits, ascending.
    pub fn runs(&self) -> Vec<(u8, u8)> {
        let mut runs: Vec<(u8, u8)> = Vec::new();
        for digit in self.digits() {
            match runs.last_mut() {
                Some((_, hi)) if *hi + 1 == digit => *hi = digit,
                _ => runs.push((digit, digit)),
            }
        }
        runs
    }
}

impl fmt::Display for DigitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DigitClass::ANY => f.write_str("X"),
            DigitClass::NON_ZERO => f.write_str("Z"),
            DigitClass::TWO_TO_NINE => f.write_str("N"),
            _ => {
                f.write_str("[")?;
                for (lo, hi) in self.runs() {
                    if lo == hi {
                        write!(f, "{}", lo)?;
                    } else {
                        write!(f, "{}-{}", lo, hi)?;
                    }
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 9 => "X" ; "full span is X")]
    #[test_case(1, 9 => "Z" ; "one to nine is Z")]
    #[test_case(2, 9 => "N" ; "two to nine is N")]
    #[test_case(3, 6 => "[3-6]" ; "plain bracket")]
    #[test_case(8, 9 => "[8-9]" ; "two digit bracket")]
    #[test_case(0, 8 => "[0-8]" ; "almost full")]
    #[test_case(4, 4 => "[4]" ; "single digit")]
    fn span_display(lo: u8, hi: u8) -> String {
        DigitClass::span(lo, hi).to_string()
    }

    #[test]
    fn runs_split_on_gaps() {
        let mut class = DigitClass::single(1);
        for d in [5, 6, 7, 9] {
            class.insert(d);
        }
        assert_eq!(class.runs(), vec![(1, 1), (5, 7), (9, 9)]);
        assert_eq!(class.to_string(), "[15-79]");
        assert_eq!(class.width(), 5);
    }

    #[test]
    fn span_clamps_and_inverts() {
        assert_eq!(DigitClass::span(7, 12), DigitClass::span(7, 9));
        assert!(DigitClass::span(5, 2).is_empty());
    }
}
