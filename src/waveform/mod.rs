//! In-memory waveform segments and merging.

mod merge;
mod segment;

pub use merge::{MergedWaveform, merge_segments};
pub use segment::{Segment, sample_offset};
