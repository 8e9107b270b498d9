use thiserror::Error;

use crate::block::Block;
use crate::render::to_pattern;

/// Ways a block sequence can fail to be an exact cover of a range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverDefect {
    #[error("numbers {from}..={to} are not covered")]
    Gap { from: u64, to: u64 },
    #[error("block starting at {at} overlaps or precedes the previous block")]
    Overlap { at: u64 },
    #[error("block {start}..={end} lies outside the range")]
    OutOfBounds { start: u64, end: u64 },
    #[error("no single pattern matches exactly {start}..={end} (rendered as {pattern})")]
    NotRepresentable { start: u64, end: u64, pattern: String },
}

/// Check that `blocks` cover `[min, max]` in order, without gaps or
/// overlaps, and that every block renders to a pattern matching exactly it.
/// Returns every defect found.
pub fn verify(min: u64, max: u64, blocks: &[Block]) -> Vec<CoverDefect> {
    let mut defects = Vec::new();

    if min > max {
        if let Some(first) = blocks.first() {
            defects.push(CoverDefect::OutOfBounds {
                start: first.start,
                end: first.end(),
            });
        }
        return defects;
    }

    let mut next = min;
    // Set once `max` has been covered; `next` would overflow at u64::MAX.
    let mut done = false;

    for block in blocks {
        if block.size == 0 || block.start < min || block.end() > max {
            defects.push(CoverDefect::OutOfBounds {
                start: block.start,
                end: block.end(),
            });
            continue;
        }
        if done || block.start < next {
            defects.push(CoverDefect::Overlap { at: block.start });
        } else if block.start > next {
            defects.push(CoverDefect::Gap {
                from: next,
                to: block.start - 1,
            });
        }
        if !block.is_representable() {
            defects.push(CoverDefect::NotRepresentable {
                start: block.start,
                end: block.end(),
                pattern: to_pattern(block).to_string(),
            });
        }
        if !done && block.end() >= next {
            if block.end() == max {
                done = true;
            } else {
                next = block.end() + 1;
            }
        }
    }

    if !done {
        defects.push(CoverDefect::Gap { from: next, to: max });
    }
    defects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{CoverMode, Partitioner};

    #[test]
    fn exact_cover_has_no_defects() {
        let blocks = Partitioner::with_mode(CoverMode::Exact)
            .partition(636, 6734)
            .unwrap();
        assert_eq!(verify(636, 6734, &blocks), vec![]);
    }

    #[test]
    fn reference_hole_is_reported() {
        let blocks = Partitioner::default().partition(636, 6734).unwrap();
        assert_eq!(
            verify(636, 6734, &blocks),
            vec![CoverDefect::Gap { from: 700, to: 799 }]
        );
    }

    #[test]
    fn trailing_gap_and_overlap() {
        let blocks = [Block::inclusive(10, 19), Block::inclusive(15, 19)];
        assert_eq!(
            verify(10, 25, &blocks),
            vec![
                CoverDefect::Overlap { at: 15 },
                CoverDefect::Gap { from: 20, to: 25 },
            ]
        );
    }

    #[test]
    fn oversized_block_is_not_representable() {
        let blocks = [Block::inclusive(130, 145)];
        assert_eq!(
            verify(130, 145, &blocks),
            vec![CoverDefect::NotRepresentable {
                start: 130,
                end: 145,
                pattern: "_1[3-4]X".to_string()
            }]
        );
    }
}
