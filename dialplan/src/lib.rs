pub mod parser;
pub mod pattern;

pub use parser::{ParseError, Parser};
pub use pattern::{DigitClass, Element, Pattern};
