//! Decomposition of a number range into pattern-sized blocks.
//!
//! The cover walks a descending ladder of magnitudes (`10^(ceiling-1)` down
//! to 10). At each level the range is cut at `cap`, the first multiple of the
//! magnitude at or above `start`: the part below `cap` is handed to the next
//! finer level, and the part above it is covered with as many whole
//! magnitude-sized blocks as fit before the remainder is handed down again.
//! Recursion depth is bounded by the number of levels, not by the range width.

use log::{debug, trace};

use crate::block::Block;
use crate::digits::{digit_length, pow10, round_up};
use crate::error::RangeError;
use crate::interval::Interval;
use crate::render::render;

/// Width of the innermost level. The base case always aligns to decades.
const DECADE: u64 = 10;

pub const DEFAULT_CEILING_DIGITS: u32 = 8;
pub const MIN_CEILING_DIGITS: u32 = 1;
/// Keeps every intermediate sum of the descent inside `u64`.
pub const MAX_CEILING_DIGITS: u32 = 18;

/// Which flavour of the greedy cover to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CoverMode {
    /// The established heuristic, branch for branch. Its output is what
    /// existing dialplans were generated with, including two known holes: an
    /// aligned tail drops the block just above `cap`, and a range ending
    /// exactly one past a whole block loses that last number.
    #[default]
    Reference,
    /// The same heuristic, split at digit-length boundaries, with both holes
    /// closed and any block no single pattern can express split further.
    /// Always a gap-free, overlap-free cover.
    Exact,
}

/// Splits ranges into blocks. Cheap to copy; holds no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    ceiling_digits: u32,
    mode: CoverMode,
}

impl Default for Partitioner {
    fn default() -> Self {
        Partitioner {
            ceiling_digits: DEFAULT_CEILING_DIGITS,
            mode: CoverMode::Reference,
        }
    }
}

impl Partitioner {
    pub fn new(ceiling_digits: u32, mode: CoverMode) -> Result<Self, RangeError> {
        if !(MIN_CEILING_DIGITS..=MAX_CEILING_DIGITS).contains(&ceiling_digits) {
            return Err(RangeError::InvalidCeiling {
                got: ceiling_digits,
                min: MIN_CEILING_DIGITS,
                max: MAX_CEILING_DIGITS,
            });
        }
        Ok(Partitioner {
            ceiling_digits,
            mode,
        })
    }

    pub fn with_mode(mode: CoverMode) -> Self {
        Partitioner {
            mode,
            ..Partitioner::default()
        }
    }

    pub fn mode(&self) -> CoverMode {
        self.mode
    }

    pub fn ceiling_digits(&self) -> u32 {
        self.ceiling_digits
    }

    /// Coarsest magnitude the descent starts from.
    pub fn top_magnitude(&self) -> u64 {
        pow10(self.ceiling_digits - 1)
    }

    /// Smallest number above the supported range.
    pub fn limit(&self) -> u64 {
        pow10(self.ceiling_digits)
    }

    /// Cover `[min, max]` with blocks in ascending order. An empty range
    /// (`min > max`) yields no blocks.
    pub fn partition(&self, min: u64, max: u64) -> Result<Vec<Block>, RangeError> {
        let mut blocks = Vec::new();
        if min > max {
            debug!("empty range {}..={}, nothing to cover", min, max);
            return Ok(blocks);
        }
        if max >= self.limit() {
            return Err(RangeError::AboveCeiling {
                value: max,
                digits: self.ceiling_digits,
            });
        }

        match self.mode {
            CoverMode::Reference => self.descend(self.top_magnitude(), min, max, &mut blocks),
            CoverMode::Exact => {
                for (lo, hi) in digit_length_segments(min, max) {
                    self.descend(self.top_magnitude(), lo, hi, &mut blocks);
                }
            }
        }

        debug!(
            "covered {}..={} with {} block(s) ({:?})",
            min,
            max,
            blocks.len(),
            self.mode
        );
        Ok(blocks)
    }

    pub fn partition_interval(&self, interval: &Interval) -> Result<Vec<Block>, RangeError> {
        self.partition(interval.min, interval.max)
    }

    /// Partition and render every block.
    pub fn patterns(&self, min: u64, max: u64) -> Result<Vec<String>, RangeError> {
        Ok(self.partition(min, max)?.iter().map(render).collect())
    }

    fn descend(&self, amt: u64, start: u64, end: u64, out: &mut Vec<Block>) {
        trace!("descend amt={} start={} end={}", amt, start, end);
        if amt <= DECADE {
            self.descend_decades(amt, start, end, out);
            return;
        }

        let cap = round_up(start, amt);
        if cap > start {
            self.descend(amt / 10, start, end.min(cap - 1), out);
        }

        if end < cap + amt {
            // Less than one whole block above cap.
            self.descend(amt / 10, cap, end, out);
            return;
        }

        if (end + 1) % amt == 0 && (end - (cap + amt) + 1) % amt == 0 {
            match self.mode {
                CoverMode::Reference => self.emit(out, cap + amt, end + 1),
                CoverMode::Exact => self.emit(out, cap, end + 1),
            }
            return;
        }

        let diff = end - cap;
        if diff >= amt * 2 {
            let top = (diff / amt) * amt + cap;
            self.emit(out, cap, top);
            if end > cap + amt {
                self.descend(amt, top, end, out);
            }
        } else {
            self.emit(out, cap, cap + amt);
            let remains = match self.mode {
                CoverMode::Reference => end > cap + amt,
                CoverMode::Exact => end >= cap + amt,
            };
            if remains {
                self.descend(amt, cap + amt, end, out);
            }
        }
    }

    fn descend_decades(&self, amt: u64, start: u64, end: u64, out: &mut Vec<Block>) {
        if end < start {
            return;
        }
        let d = round_up(start, DECADE);
        if d > end {
            self.emit(out, start, end + 1);
            return;
        }

        // Up to the next decade, e.g. 234..=239.
        self.emit(out, start, d);
        let diff = end - d;
        if diff >= amt * 2 && (diff + 1) % amt > 0 {
            let top = (diff / amt) * amt + d;
            self.emit(out, d, top);
            if end > d + amt {
                self.descend_decades(amt, top, end, out);
            }
        } else {
            self.emit(out, d, end + 1);
        }
    }

    /// Record `start..stop`; empty spans are dropped.
    fn emit(&self, out: &mut Vec<Block>, start: u64, stop: u64) {
        if stop <= start {
            return;
        }
        let block = Block::new(start, stop - start);
        if self.mode == CoverMode::Exact && !block.is_representable() {
            trace!("splitting {}..{} into aligned blocks", start, stop);
            split_aligned(start, stop, out);
            return;
        }
        trace!("block {}..={}", block.start, block.end());
        out.push(block);
    }
}

/// Cover `[min, max]` with the default partitioner.
pub fn partition(min: u64, max: u64) -> Result<Vec<Block>, RangeError> {
    Partitioner::default().partition(min, max)
}

/// Pieces of `[min, max]` in which every number has the same digit-length.
fn digit_length_segments(min: u64, max: u64) -> Vec<(u64, u64)> {
    let mut segments = Vec::new();
    let mut lo = min;
    loop {
        let len = digit_length(lo);
        let hi = if len >= 20 { u64::MAX } else { pow10(len) - 1 };
        segments.push((lo, hi.min(max)));
        if hi >= max {
            break;
        }
        lo = hi + 1;
    }
    segments
}

/// Greedy cover of `start..stop` by the largest aligned class blocks. Every
/// block it produces is representable.
fn split_aligned(mut start: u64, stop: u64, out: &mut Vec<Block>) {
    while start < stop {
        let len = digit_length(start);
        let mut t = 0;
        while t + 1 < len && start % pow10(t + 1) == 0 && start + pow10(t + 1) <= stop {
            t += 1;
        }
        let unit = pow10(t);
        let digit = (start / unit) % 10;
        let width = ((stop - start) / unit).min(10 - digit);
        out.push(Block::new(start, width * unit));
        start += width * unit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(blocks: &[Block]) -> Vec<(u64, u64)> {
        blocks.iter().map(|b| (b.start, b.end())).collect()
    }

    #[test]
    fn reference_blocks_for_documented_range() {
        let blocks = partition(234, 742).unwrap();
        assert_eq!(
            spans(&blocks),
            vec![(234, 239), (240, 299), (300, 699), (700, 739), (740, 742)]
        );
    }

    #[test]
    fn reference_keeps_the_aligned_tail_hole() {
        let blocks = partition(636, 999).unwrap();
        assert_eq!(spans(&blocks), vec![(636, 639), (640, 699), (800, 999)]);
    }

    #[test]
    fn reference_drops_number_one_past_a_block() {
        let blocks = partition(100, 200).unwrap();
        assert_eq!(spans(&blocks), vec![(100, 199)]);
    }

    #[test]
    fn exact_closes_both_holes() {
        let exact = Partitioner::with_mode(CoverMode::Exact);
        assert_eq!(
            spans(&exact.partition(636, 999).unwrap()),
            vec![(636, 639), (640, 699), (700, 999)]
        );
        assert_eq!(
            spans(&exact.partition(100, 200).unwrap()),
            vec![(100, 199), (200, 200)]
        );
    }

    #[test]
    fn exact_splits_at_digit_lengths() {
        let exact = Partitioner::with_mode(CoverMode::Exact);
        assert_eq!(
            spans(&exact.partition(5, 25).unwrap()),
            vec![(5, 9), (10, 19), (20, 25)]
        );
    }

    #[test]
    fn exact_splits_unrepresentable_decade_runs() {
        let exact = Partitioner::with_mode(CoverMode::Exact);
        assert_eq!(
            spans(&exact.partition(130, 145).unwrap()),
            vec![(130, 139), (140, 145)]
        );
    }

    #[test]
    fn empty_range_is_not_an_error() {
        assert_eq!(partition(10, 9), Ok(vec![]));
        assert_eq!(partition(u64::MAX, 0), Ok(vec![]));
    }

    #[test]
    fn ceiling_is_enforced() {
        assert_eq!(
            partition(0, 100_000_000),
            Err(RangeError::AboveCeiling {
                value: 100_000_000,
                digits: 8
            })
        );
        assert!(partition(0, 99_999_999).is_ok());

        let wide = Partitioner::new(10, CoverMode::Exact).unwrap();
        assert_eq!(wide.top_magnitude(), 1_000_000_000);
        assert!(wide.partition(0, 9_999_999_999).is_ok());
    }

    #[test]
    fn ceiling_bounds() {
        assert!(Partitioner::new(0, CoverMode::Reference).is_err());
        assert!(Partitioner::new(19, CoverMode::Reference).is_err());
        assert!(Partitioner::new(1, CoverMode::Reference).is_ok());
        assert!(Partitioner::new(18, CoverMode::Exact).is_ok());
    }

    #[test]
    fn segments_follow_digit_lengths() {
        assert_eq!(digit_length_segments(0, 9), vec![(0, 9)]);
        assert_eq!(
            digit_length_segments(7, 1234),
            vec![(7, 9), (10, 99), (100, 999), (1000, 1234)]
        );
    }

    #[test]
    fn aligned_split_respects_digit_boundaries() {
        let mut out = Vec::new();
        split_aligned(0, 26, &mut out);
        assert_eq!(spans(&out), vec![(0, 9), (10, 19), (20, 25)]);
        assert!(out.iter().all(Block::is_representable));
    }
}
