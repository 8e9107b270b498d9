//! Base-10 helpers over canonical non-negative integers.
//!
//! Positions count from the most significant digit, starting at 0.

/// Number of decimal digits in `n`; `0` has one digit.
pub fn digit_length(n: u64) -> u32 {
    n.checked_ilog10().map_or(1, |log| log + 1)
}

/// `10^exp`. Callers keep `exp` at or below 19.
pub fn pow10(exp: u32) -> u64 {
    10u64.pow(exp)
}

/// The digit of `n` at `position` from the left, or 0 past the last digit.
pub fn digit_at(n: u64, position: u32) -> u8 {
    let len = digit_length(n);
    if position >= len {
        return 0;
    }
    ((n / pow10(len - 1 - position)) % 10) as u8
}

pub fn leading_digit(n: u64) -> u8 {
    digit_at(n, 0)
}

/// Smallest multiple of `step` that is `>= n`.
pub fn round_up(n: u64, step: u64) -> u64 {
    n.div_ceil(step) * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0 => 1)]
    #[test_case(9 => 1)]
    #[test_case(10 => 2)]
    #[test_case(99_999_999 => 8)]
    #[test_case(100_000_000 => 9)]
    #[test_case(u64::MAX => 20)]
    fn lengths(n: u64) -> u32 {
        digit_length(n)
    }

    #[test]
    fn digits_from_the_left() {
        assert_eq!(digit_at(6734, 0), 6);
        assert_eq!(digit_at(6734, 1), 7);
        assert_eq!(digit_at(6734, 3), 4);
        assert_eq!(digit_at(6734, 4), 0);
        assert_eq!(digit_at(0, 0), 0);
        assert_eq!(leading_digit(399), 3);
    }

    #[test]
    fn rounding_is_exact_at_large_magnitudes() {
        assert_eq!(round_up(0, 100), 0);
        assert_eq!(round_up(234, 100), 300);
        assert_eq!(round_up(300, 100), 300);
        assert_eq!(round_up(99_999_999_999_999_999, 10), 100_000_000_000_000_000);
    }
}
