//! Transcript accumulation and hypothesis selection
//!
//! - `select_best` chooses one candidate for a finalized result
//! - `TranscriptAccumulator` keeps finalized segments and the interim guess

mod accumulator;
mod selector;

pub use accumulator::{FinalizedSegment, TranscriptAccumulator, TranscriptSnapshot};
pub use selector::select_best;
