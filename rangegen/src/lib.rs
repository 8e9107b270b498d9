pub mod block;
pub mod digits;
pub mod error;
pub mod expand;
pub mod interval;
pub mod partition;
pub mod render;
pub mod verify;

pub use block::Block;
pub use error::{ExpandError, RangeError};
pub use expand::expand;
pub use interval::Interval;
pub use partition::{CoverMode, Partitioner, partition};
pub use render::{render, to_pattern};
pub use verify::{CoverDefect, verify};

/// Patterns for `[min, max]` using the default partitioner, one per block.
pub fn generate(min: u64, max: u64) -> Result<Vec<String>, RangeError> {
    Partitioner::default().patterns(min, max)
}
