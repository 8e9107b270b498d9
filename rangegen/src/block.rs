use crate::digits::{digit_at, digit_length, leading_digit, pow10};

/// A run of consecutive integers `[start, start + size - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub start: u64,
    pub size: u64,
}

impl Block {
    pub fn new(start: u64, size: u64) -> Self {
        Block { start, size }
    }

    /// Block covering `start..=end`.
    pub fn inclusive(start: u64, end: u64) -> Self {
        Block {
            start,
            size: end - start + 1,
        }
    }

    /// Last integer in the block.
    pub fn end(&self) -> u64 {
        self.start + self.size.saturating_sub(1)
    }

    pub fn contains(&self, n: u64) -> bool {
        self.size > 0 && n >= self.start && n <= self.end()
    }

    /// Whether a single pattern matches exactly this block: every integer
    /// shares one digit-length, and the block is one digit class followed by
    /// full wildcards (`size = width * 10^t` with `start` aligned to `10^t`).
    pub fn is_representable(&self) -> bool {
        if self.size == 0 {
            return false;
        }
        let qty = self.size - 1;
        if qty == 0 {
            return true;
        }
        let vary = digit_length(qty);
        let total = digit_length(self.start);
        if vary > total {
            return false;
        }
        let unit = pow10(vary - 1);
        let f = u64::from(leading_digit(qty));
        if self.size != (f + 1) * unit || self.start % unit != 0 {
            return false;
        }
        let class_digit = digit_at(self.start, total - vary);
        u64::from(class_digit) + f <= 9
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(134, 6 => true ; "partial decade")]
    #[test_case(240, 60 => true ; "aligned decades")]
    #[test_case(300, 400 => true ; "aligned hundreds")]
    #[test_case(0, 10 => true ; "single digits")]
    #[test_case(5, 1 => true ; "singleton")]
    #[test_case(130, 16 => false ; "sixteen is not a class width")]
    #[test_case(135, 10 => false ; "unaligned decade")]
    #[test_case(0, 20 => false ; "crosses digit length")]
    #[test_case(95, 10 => false ; "crosses into two digits")]
    #[test_case(170, 40 => false ; "class overflows the digit")]
    #[test_case(7, 0 => false ; "empty")]
    fn representability(start: u64, size: u64) -> bool {
        Block::new(start, size).is_representable()
    }

    #[test]
    fn bounds() {
        let block = Block::inclusive(700, 739);
        assert_eq!(block.size, 40);
        assert_eq!(block.end(), 739);
        assert!(block.contains(700));
        assert!(block.contains(739));
        assert!(!block.contains(740));
        assert!(!block.contains(699));
    }
}
