pub mod error;

pub use error::ParseError;

use crate::pattern::{DigitClass, Element, Pattern};

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source text into a Pattern. Every error found is reported,
    /// not just the first.
    pub fn parse(&self) -> Result<Pattern, Vec<ParseError>> {
        if self.source.is_empty() {
            return Err(vec![ParseError::error("empty pattern", 0..0, self.file_id)]);
        }

        match self.source.strip_prefix('_') {
            Some(body) => self.parse_match(body, 1),
            None => self.parse_literal(),
        }
    }

    fn parse_literal(&self) -> Result<Pattern, Vec<ParseError>> {
        let errors: Vec<ParseError> = self
            .source
            .char_indices()
            .filter(|(_, c)| !c.is_ascii_digit())
            .map(|(pos, c)| {
                ParseError::error(
                    format!("unexpected character '{}' in literal extension", c),
                    pos..pos + c.len_utf8(),
                    self.file_id,
                )
                .with_note("prefix the pattern with '_' to use wildcards")
            })
            .collect();

        if errors.is_empty() {
            Ok(Pattern::Literal(self.source.clone()))
        } else {
            Err(errors)
        }
    }

    fn parse_match(&self, body: &str, offset: usize) -> Result<Pattern, Vec<ParseError>> {
        if body.is_empty() {
            return Err(vec![ParseError::error(
                "pattern has no elements after '_'",
                0..1,
                self.file_id,
            )]);
        }

        let mut elements = Vec::new();
        let mut errors = Vec::new();
        // Span of a `.` or `!` already seen; anything after it is an error.
        let mut tail: Option<usize> = None;
        let mut chars = body.char_indices();

        while let Some((rel, c)) = chars.next() {
            let pos = offset + rel;
            let element = match c {
                '0'..='9' => Element::Digit(c as u8 - b'0'),
                'X' | 'x' => Element::Class(DigitClass::ANY),
                'Z' | 'z' => Element::Class(DigitClass::NON_ZERO),
                'N' | 'n' => Element::Class(DigitClass::TWO_TO_NINE),
                '.' => Element::OneOrMore,
                '!' => Element::ZeroOrMore,
                '[' => {
                    let mut end = pos + 1;
                    let mut inner = String::new();
                    let mut closed = false;
                    for (rel, c) in chars.by_ref() {
                        end = offset + rel + c.len_utf8();
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        errors.push(ParseError::error(
                            "unterminated digit class",
                            pos..end,
                            self.file_id,
                        ).with_note("close the class with ']'"));
                        break;
                    }
                    match self.parse_class(&inner, pos + 1) {
                        Ok(class) => Element::Class(class),
                        Err(mut class_errors) => {
                            errors.append(&mut class_errors);
                            continue;
                        }
                    }
                }
                _ => {
                    errors.push(ParseError::error(
                        format!("unexpected character '{}' in pattern", c),
                        pos..pos + c.len_utf8(),
                        self.file_id,
                    ));
                    continue;
                }
            };

            if let Some(tail_pos) = tail {
                errors.push(
                    ParseError::error(
                        "elements after a trailing wildcard",
                        pos..pos + c.len_utf8(),
                        self.file_id,
                    )
                    .with_note(format!(
                        "the wildcard at byte {} must be the last element",
                        tail_pos
                    )),
                );
                break;
            }
            if matches!(element, Element::OneOrMore | Element::ZeroOrMore) {
                tail = Some(pos);
            }
            elements.push(element);
        }

        if errors.is_empty() {
            Ok(Pattern::Match(elements))
        } else {
            Err(errors)
        }
    }

    /// Parse the inside of `[...]`: digits and `lo-hi` ranges, e.g. `15-7`.
    fn parse_class(&self, inner: &str, offset: usize) -> Result<DigitClass, Vec<ParseError>> {
        let mut class = DigitClass::empty();
        let mut errors = Vec::new();
        let bytes = inner.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let pos = offset + i;
            let b = bytes[i];
            if !b.is_ascii_digit() {
                let width = inner[i..].chars().next().map_or(1, char::len_utf8);
                errors.push(ParseError::error(
                    "digit classes may only contain digits and ranges",
                    pos..pos + width,
                    self.file_id,
                ));
                i += width;
                continue;
            }
            let lo = b - b'0';
            if bytes.get(i + 1) == Some(&b'-') {
                match bytes.get(i + 2) {
                    Some(hi) if hi.is_ascii_digit() => {
                        let hi = hi - b'0';
                        if hi < lo {
                            errors.push(
                                ParseError::error(
                                    format!("reversed range {}-{}", lo, hi),
                                    pos..pos + 3,
                                    self.file_id,
                                )
                                .with_note(format!("write it as {}-{}", hi, lo)),
                            );
                        } else {
                            for digit in lo..=hi {
                                class.insert(digit);
                            }
                        }
                        i += 3;
                    }
                    _ => {
                        errors.push(ParseError::error(
                            "range is missing its upper digit",
                            pos..pos + 2,
                            self.file_id,
                        ));
                        i += 2;
                    }
                }
            } else {
                class.insert(lo);
                i += 1;
            }
        }

        if errors.is_empty() && class.is_empty() {
            errors.push(ParseError::error(
                "empty digit class",
                offset.saturating_sub(1)..offset + inner.len() + 1,
                self.file_id,
            ));
        }

        if errors.is_empty() {
            Ok(class)
        } else {
            Err(errors)
        }
    }
}

/// Parse a single pattern with file id 0.
pub fn parse(source: &str) -> Result<Pattern, Vec<ParseError>> {
    Parser::new(source.to_string(), 0).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("_13[4-9]" ; "bracket tail")]
    #[test_case("_2[4-9]X" ; "bracket then wildcard")]
    #[test_case("_[3-6]XX" ; "leading bracket")]
    #[test_case("_X" ; "single wildcard")]
    #[test_case("_ZXXXXXX" ; "z class")]
    #[test_case("_NXXNXXXXXX" ; "nanp shape")]
    #[test_case("_9." ; "one or more")]
    #[test_case("_1!" ; "zero or more")]
    #[test_case("_[15-79]" ; "split class")]
    #[test_case("5" ; "literal")]
    #[test_case("6734" ; "longer literal")]
    fn canonical_text_round_trips(text: &str) {
        let pattern = parse(text).expect("parse failed");
        assert_eq!(pattern.to_string(), text);
    }

    #[test]
    fn lowercase_tokens_and_redundant_brackets_normalize() {
        assert_eq!(parse("_nxx").unwrap().to_string(), "_NXX");
        assert_eq!(parse("_[0-9]").unwrap().to_string(), "_X");
        assert_eq!(parse("_[1-9]").unwrap().to_string(), "_Z");
        assert_eq!(parse("_[7531]").unwrap().to_string(), "_[1357]");
    }

    #[test]
    fn literal_rejects_wildcards() {
        let errors = parse("12X").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 2..3);
        assert!(errors[0].message.contains("'X'"));
        assert_eq!(errors[0].notes.len(), 1);
    }

    #[test_case("" => "empty pattern" ; "empty")]
    #[test_case("_" => "pattern has no elements after '_'" ; "bare underscore")]
    #[test_case("_1[2-" => "unterminated digit class" ; "unterminated")]
    #[test_case("_1[]" => "empty digit class" ; "empty class")]
    #[test_case("_[5-2]" => "reversed range 5-2" ; "reversed")]
    #[test_case("_[5-]" => "range is missing its upper digit" ; "open range")]
    #[test_case("_[a]" => "digit classes may only contain digits and ranges" ; "letter in class")]
    #[test_case("_9.1" => "elements after a trailing wildcard" ; "element after wildcard")]
    #[test_case("_1Y" => "unexpected character 'Y' in pattern" ; "unknown token")]
    fn first_error(text: &str) -> String {
        parse(text).unwrap_err()[0].message.clone()
    }

    #[test]
    fn collects_every_error() {
        let errors = parse("_1Q[9-1]W").unwrap_err();
        let spans: Vec<_> = errors.iter().map(|e| e.span.clone()).collect();
        assert_eq!(spans, vec![2..3, 4..7, 8..9]);
    }

    #[test]
    fn diagnostics_carry_file_id() {
        let errors = Parser::new("_1?".to_string(), 3).parse().unwrap_err();
        let diagnostic = errors[0].to_diagnostic();
        assert_eq!(diagnostic.labels[0].file_id, 3);
        assert_eq!(diagnostic.labels[0].range, 2..3);
    }
}
