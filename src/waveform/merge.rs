//! Merging of segments into one contiguous trace.

use super::segment::Segment;
use crate::error::Error;
use crate::utils::date::nanos_between;
use tracing::{debug, warn};

/// A contiguous trace assembled from one or more segments.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedWaveform {
    /// The merged trace.
    pub trace: Segment,
    /// Zero-filled samples inserted where no segment had data.
    pub gap_samples: usize,
    /// Samples discarded because an earlier segment already covered them.
    pub overlap_samples: usize,
    /// Segments dropped because their sample rate differed.
    pub dropped_segments: usize,
}

/// Merge segments in read order.
///
/// The first segment fixes the identity and sample rate. Samples are placed at
/// `round((t - start) * rate)`; where segments overlap the earlier one in the input
/// wins, and positions covered by no segment are zero. Returns `None` when no segment
/// contributes a sample.
pub fn merge_segments(segments: &[Segment]) -> Option<MergedWaveform> {
    let reference = segments.iter().find(|s| !s.is_empty())?;
    let rate = reference.sample_rate;

    let mut dropped_segments = 0;
    let kept: Vec<&Segment> = segments
        .iter()
        .filter(|s| !s.is_empty())
        .filter(|s| {
            if rates_match(s.sample_rate, rate) {
                true
            } else {
                let mismatch = Error::SampleRateMismatch {
                    id: s.id(),
                    expected: rate,
                    actual: s.sample_rate,
                };
                warn!("Dropping segment starting {}: {mismatch}", s.start);
                dropped_segments += 1;
                false
            }
        })
        .collect();

    let start = kept.iter().map(|s| s.start).min()?;
    let placed: Vec<(usize, &Segment)> = kept
        .iter()
        .map(|s| (sample_index(nanos_between(&start, &s.start), rate), *s))
        .collect();
    let total = placed
        .iter()
        .map(|(idx, s)| idx + s.len())
        .max()
        .unwrap_or(0);

    let mut samples = vec![0.0_f32; total];
    let mut filled = vec![false; total];
    let mut overlap_samples = 0;

    for (offset, segment) in placed {
        for (i, value) in segment.samples.iter().enumerate() {
            let pos = offset + i;
            if filled[pos] {
                overlap_samples += 1;
            } else {
                samples[pos] = *value;
                filled[pos] = true;
            }
        }
    }

    let gap_samples = filled.iter().filter(|f| !**f).count();
    if gap_samples > 0 || overlap_samples > 0 {
        debug!(
            "Merged {} segment(s) of {}: {} gap sample(s) zero-filled, {} overlapping sample(s) discarded",
            segments.len(),
            reference.id(),
            gap_samples,
            overlap_samples
        );
    }

    Some(MergedWaveform {
        trace: Segment {
            network: reference.network.clone(),
            station: reference.station.clone(),
            location: reference.location.clone(),
            channel: reference.channel.clone(),
            start,
            sample_rate: rate,
            samples,
        },
        gap_samples,
        overlap_samples,
        dropped_segments,
    })
}

fn rates_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= b.abs() * 1e-6
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn sample_index(offset_ns: i64, sample_rate: f64) -> usize {
    (offset_ns as f64 * sample_rate / 1e9).round().max(0.0) as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 5, 1, 15, 0, 0).unwrap()
    }

    fn segment(start_secs: i64, rate: f64, samples: &[f32]) -> Segment {
        Segment {
            network: "JX".to_string(),
            station: "WAA".to_string(),
            location: "00".to_string(),
            channel: "BHZ".to_string(),
            start: t0() + TimeDelta::seconds(start_secs),
            sample_rate: rate,
            samples: samples.to_vec(),
        }
    }

    #[test]
    fn test_contiguous_segments_concatenate() {
        let merged =
            merge_segments(&[segment(0, 1.0, &[1.0, 2.0]), segment(2, 1.0, &[3.0, 4.0])])
                .unwrap();
        assert_eq!(merged.trace.samples, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(merged.trace.start, t0());
        assert_eq!(merged.gap_samples, 0);
        assert_eq!(merged.overlap_samples, 0);
    }

    #[test]
    fn test_gap_is_zero_filled() {
        let merged =
            merge_segments(&[segment(0, 1.0, &[1.0, 2.0]), segment(5, 1.0, &[6.0, 7.0])])
                .unwrap();
        assert_eq!(merged.trace.samples, vec![1.0, 2.0, 0.0, 0.0, 0.0, 6.0, 7.0]);
        assert_eq!(merged.gap_samples, 3);
        assert_eq!(merged.trace.len(), 2 + 3 + 2);
    }

    #[test]
    fn test_first_read_wins_on_overlap() {
        let merged = merge_segments(&[
            segment(0, 1.0, &[1.0, 2.0, 3.0]),
            segment(1, 1.0, &[-2.0, -3.0, -4.0]),
        ])
        .unwrap();
        assert_eq!(merged.trace.samples, vec![1.0, 2.0, 3.0, -4.0]);
        assert_eq!(merged.overlap_samples, 2);
    }

    #[test]
    fn test_earlier_second_read_extends_start() {
        let merged =
            merge_segments(&[segment(2, 1.0, &[3.0]), segment(0, 1.0, &[1.0, 2.0, 9.0])])
                .unwrap();
        assert_eq!(merged.trace.start, t0());
        assert_eq!(merged.trace.samples, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rate_mismatch_segment_dropped() {
        let merged =
            merge_segments(&[segment(0, 1.0, &[1.0]), segment(1, 2.0, &[5.0, 5.0])]).unwrap();
        assert_eq!(merged.trace.samples, vec![1.0]);
        assert_eq!(merged.dropped_segments, 1);
    }

    #[test]
    fn test_subsample_offsets_round() {
        let mut late = segment(2, 10.0, &[3.0]);
        late.start += TimeDelta::milliseconds(4);
        let merged = merge_segments(&[segment(0, 10.0, &[0.0; 20]), late]).unwrap();
        // 2.004 s at 10 Hz rounds onto index 20.
        assert_eq!(merged.trace.len(), 21);
        assert_eq!(merged.trace.samples[20], 3.0);
    }

    #[test]
    fn test_empty_input_gives_none() {
        assert!(merge_segments(&[]).is_none());
        assert!(merge_segments(&[segment(0, 1.0, &[])]).is_none());
    }
}
