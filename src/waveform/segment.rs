//! Contiguous runs of samples for one stream.

use chrono::{DateTime, TimeDelta, Utc};

/// Samples from one record of a network/station/location/channel stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Location code (may be empty).
    pub location: String,
    /// Channel code.
    pub channel: String,
    /// Time of the first sample.
    pub start: DateTime<Utc>,
    /// Samples per second.
    pub sample_rate: f64,
    /// Sample values.
    pub samples: Vec<f32>,
}

impl Segment {
    /// Dotted `NET.STA.LOC.CHA` identifier.
    pub fn id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }

    /// Seconds between consecutive samples.
    pub fn delta(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// Offset from `start` of the sample at `index`.
    pub fn offset_of(&self, index: usize) -> TimeDelta {
        sample_offset(index, self.sample_rate)
    }

    /// Time of the last sample, or `start` for an empty segment.
    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.offset_of(self.samples.len().saturating_sub(1))
    }

    /// Whether the segment has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Offset of sample `index` at `sample_rate`, rounded to the nearest nanosecond.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn sample_offset(index: usize, sample_rate: f64) -> TimeDelta {
    let nanos = (index as f64 * 1e9 / sample_rate).round();
    TimeDelta::nanoseconds(nanos as i64)
}
