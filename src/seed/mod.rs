//! miniSEED 2.x reader.
//!
//! Supports records carrying blockette 1000 with INT16, INT32, FLOAT32, FLOAT64,
//! Steim-1 or Steim-2 payloads, in either header byte order.

mod decode;
mod record;
mod reader;

pub use decode::decode_samples;
pub use reader::read_segments;
pub use record::{ByteOrder, RecordHeader, parse_header, sample_rate};
