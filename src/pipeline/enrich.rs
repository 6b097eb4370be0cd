//! Header enrichment from station and event metadata.

use crate::catalog::{EventRecord, StationRecord};
use crate::constants::sac::{ITIME, IO, IUNKN, NVHDR};
use crate::sac::{FloatField, IntField, SacHeader, StringField};
use crate::utils::date::{event_folder_name, nanos_between};
use crate::waveform::Segment;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Build the output header for `trace`.
///
/// The reference time is the window start, which is also the event origin, so
/// `o = 0` and `b`/`e` are the trace bounds relative to the origin.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn build_header(
    trace: &Segment,
    station: &StationRecord,
    event: &EventRecord,
    reference: &DateTime<Utc>,
) -> SacHeader {
    let mut header = SacHeader::default();

    let delta = trace.delta();
    let begin = nanos_between(reference, &trace.start) as f64 / 1e9;
    let end = begin + delta * trace.len().saturating_sub(1) as f64;

    header.set_float(FloatField::Delta, delta as f32);
    header.set_float(FloatField::B, begin as f32);
    header.set_float(FloatField::E, end as f32);
    header.set_float(FloatField::O, 0.0);

    if let Some((min, max, mean)) = sample_stats(&trace.samples) {
        header.set_float(FloatField::Depmin, min);
        header.set_float(FloatField::Depmax, max);
        header.set_float(FloatField::Depmen, mean);
    }

    header.set_float(FloatField::Stla, station.latitude as f32);
    header.set_float(FloatField::Stlo, station.longitude as f32);
    header.set_float(FloatField::Stel, station.elevation as f32);
    header.set_float(FloatField::Stdp, station.depth as f32);
    header.set_float(FloatField::Cmpaz, station.azimuth as f32);
    header.set_float(FloatField::Cmpinc, station.inclination as f32);

    header.set_float(FloatField::Evla, event.latitude as f32);
    header.set_float(FloatField::Evlo, event.longitude as f32);
    header.set_float(FloatField::Evdp, event.depth_km as f32);
    header.set_float(FloatField::Mag, event.magnitude as f32);

    header.set_int(IntField::Nzyear, reference.year());
    header.set_int(IntField::Nzjday, to_i32(reference.ordinal()));
    header.set_int(IntField::Nzhour, to_i32(reference.hour()));
    header.set_int(IntField::Nzmin, to_i32(reference.minute()));
    header.set_int(IntField::Nzsec, to_i32(reference.second()));
    header.set_int(IntField::Nzmsec, to_i32(reference.timestamp_subsec_millis()));

    header.set_int(IntField::Nvhdr, NVHDR);
    header.set_int(IntField::Npts, i32::try_from(trace.len()).unwrap_or(i32::MAX));
    header.set_int(IntField::Iftype, ITIME);
    header.set_int(IntField::Idep, IUNKN);
    header.set_int(IntField::Iztype, IO);
    header.set_int(IntField::Leven, 1);

    header.set_string(StringField::Knetwk, &trace.network);
    header.set_string(StringField::Kstnm, &trace.station);
    header.set_string(StringField::Khole, &trace.location);
    header.set_string(StringField::Kcmpnm, &trace.channel);
    header.set_string(StringField::Kevnm, &event_folder_name(reference));

    header
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn sample_stats(samples: &[f32]) -> Option<(f32, f32, f32)> {
    if samples.is_empty() {
        return None;
    }
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0_f64;
    for &value in samples {
        min = min.min(value);
        max = max.max(value);
        sum += f64::from(value);
    }
    Some((min, max, (sum / samples.len() as f64) as f32))
}
