use std::ops::RangeInclusive;

use dialplan::{DigitClass, Pattern};

use crate::digits::pow10;
use crate::error::ExpandError;

pub const DEFAULT_RANGE_LIMIT: usize = 10_000;
/// Longest pattern whose numbers always fit in a `u64`.
pub const MAX_PATTERN_DIGITS: usize = 19;

/// The numbers a fixed-length pattern matches, as ascending, merged ranges.
///
/// This is the inverse of the partitioner: expanding each rendered block
/// gives back exactly that block.
pub fn expand(pattern: &Pattern, limit: usize) -> Result<Vec<RangeInclusive<u64>>, ExpandError> {
    let classes: Vec<DigitClass> = match pattern {
        Pattern::Literal(digits) => digits
            .bytes()
            .map(|b| DigitClass::single(b.wrapping_sub(b'0')))
            .collect(),
        Pattern::Match(elements) => elements
            .iter()
            .map(|e| e.class().ok_or(ExpandError::Unbounded))
            .collect::<Result<_, _>>()?,
    };

    if classes.len() > MAX_PATTERN_DIGITS {
        return Err(ExpandError::TooLong {
            digits: classes.len(),
            max: MAX_PATTERN_DIGITS,
        });
    }
    if classes.len() > 1 && classes[0].contains(0) {
        return Err(ExpandError::LeadingZero);
    }
    if classes.iter().any(DigitClass::is_empty) || classes.is_empty() {
        return Ok(Vec::new());
    }

    // Trailing `X` positions widen each range instead of multiplying them.
    let wild = classes
        .iter()
        .rev()
        .take_while(|c| **c == DigitClass::ANY)
        .count();
    let fixed = &classes[..classes.len() - wild];
    let unit = pow10(wild as u32);

    if fixed.is_empty() {
        return Ok(vec![0..=unit - 1]);
    }

    let mut out = Vec::new();
    walk(fixed, 0, unit, limit, &mut out)?;
    Ok(out)
}

fn walk(
    classes: &[DigitClass],
    prefix: u64,
    unit: u64,
    limit: usize,
    out: &mut Vec<RangeInclusive<u64>>,
) -> Result<(), ExpandError> {
    let Some((class, rest)) = classes.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        for (lo, hi) in class.runs() {
            let start = (prefix * 10 + u64::from(lo)) * unit;
            let end = (prefix * 10 + u64::from(hi)) * unit + unit - 1;
            push_merged(out, start..=end);
            if out.len() > limit {
                return Err(ExpandError::TooManyRanges { limit });
            }
        }
        return Ok(());
    }

    for digit in class.digits() {
        walk(rest, prefix * 10 + u64::from(digit), unit, limit, out)?;
    }
    Ok(())
}

fn push_merged(out: &mut Vec<RangeInclusive<u64>>, range: RangeInclusive<u64>) {
    if let Some(last) = out.last_mut() {
        if *last.end() + 1 == *range.start() {
            *last = *last.start()..=*range.end();
            return;
        }
    }
    out.push(range);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialplan::parser::parse;

    fn ranges(text: &str) -> Result<Vec<RangeInclusive<u64>>, ExpandError> {
        expand(&parse(text).expect("parse failed"), DEFAULT_RANGE_LIMIT)
    }

    #[test]
    fn single_class_patterns_are_one_range() {
        assert_eq!(ranges("_13[4-9]"), Ok(vec![134..=139]));
        assert_eq!(ranges("_[3-6]XX"), Ok(vec![300..=699]));
        assert_eq!(ranges("_X"), Ok(vec![0..=9]));
        assert_eq!(ranges("_NXX"), Ok(vec![200..=999]));
        assert_eq!(ranges("6734"), Ok(vec![6734..=6734]));
    }

    #[test]
    fn split_classes_give_several_ranges() {
        assert_eq!(ranges("_[15-7]X"), Ok(vec![10..=19, 50..=79]));
        assert_eq!(ranges("_2[09]"), Ok(vec![20..=20, 29..=29]));
    }

    #[test]
    fn adjacent_runs_merge_across_prefixes() {
        // 19 and 20 are adjacent even though they come from different prefixes.
        assert_eq!(ranges("_[1-2][09]"), Ok(vec![10..=10, 19..=20, 29..=29]));
    }

    #[test]
    fn rejects_unsupported_shapes() {
        assert_eq!(ranges("_9."), Err(ExpandError::Unbounded));
        assert_eq!(ranges("_XX"), Err(ExpandError::LeadingZero));
        assert_eq!(ranges("05"), Err(ExpandError::LeadingZero));
        assert_eq!(
            ranges("_ZXXXXXXXXXXXXXXXXXXX"),
            Err(ExpandError::TooLong { digits: 20, max: 19 })
        );
    }

    #[test]
    fn stops_at_the_limit() {
        let pattern = parse("_Z[13579][13579]").unwrap();
        assert_eq!(
            expand(&pattern, 10),
            Err(ExpandError::TooManyRanges { limit: 10 })
        );
        assert_eq!(expand(&pattern, 1000).map(|r| r.len()), Ok(225));
    }
}
