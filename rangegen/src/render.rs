use dialplan::{DigitClass, Element, Pattern};

use crate::block::Block;
use crate::digits::{digit_at, digit_length, leading_digit};

/// Build the pattern matching a block produced by the partitioner.
///
/// `size - 1` carries everything needed: its digit-length is the number of
/// varying positions and its leading digit is the class width minus one.
/// Blocks that are not representable still render, but the pattern will not
/// match exactly their numbers.
pub fn to_pattern(block: &Block) -> Pattern {
    let qty = block.size.saturating_sub(1);
    if qty == 0 {
        return Pattern::Literal(block.start.to_string());
    }

    let total = digit_length(block.start);
    let vary = digit_length(qty);
    let fixed = total.saturating_sub(vary);

    let mut elements: Vec<Element> = (0..fixed)
        .map(|position| Element::Digit(digit_at(block.start, position)))
        .collect();

    let pattern_digit = digit_at(block.start, fixed);
    let f = leading_digit(qty);
    elements.push(Element::Class(DigitClass::span(
        pattern_digit,
        pattern_digit + f,
    )));
    elements.extend(std::iter::repeat_n(
        Element::Class(DigitClass::ANY),
        (vary - 1) as usize,
    ));

    Pattern::Match(elements)
}

/// Text form of [`to_pattern`].
pub fn render(block: &Block) -> String {
    to_pattern(block).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(134, 6 => "_13[4-9]" ; "last digit class")]
    #[test_case(240, 60 => "_2[4-9]X" ; "tens class")]
    #[test_case(300, 400 => "_[3-6]XX" ; "hundreds class")]
    #[test_case(740, 3 => "_74[0-2]" ; "short class")]
    #[test_case(0, 10 => "_X" ; "x token")]
    #[test_case(10, 90 => "_ZX" ; "z token")]
    #[test_case(200, 800 => "_NXX" ; "n token")]
    #[test_case(6730, 5 => "_673[0-4]" ; "four digits")]
    #[test_case(2000, 1000 => "_2XXX" ; "single leading digit")]
    #[test_case(5, 1 => "5" ; "literal")]
    #[test_case(6734, 1 => "6734" ; "longer literal")]
    fn renders(start: u64, size: u64) -> String {
        render(&Block::new(start, size))
    }

    #[test]
    fn rendered_pattern_matches_exactly_its_block() {
        let block = Block::inclusive(6000, 6699);
        let pattern = to_pattern(&block);
        assert_eq!(pattern.to_string(), "_6[0-6]XX");
        assert_eq!(pattern.count(), Some(block.size));
        assert!(pattern.matches_number(6000));
        assert!(pattern.matches_number(6699));
        assert!(!pattern.matches_number(5999));
        assert!(!pattern.matches_number(6700));
    }
}
